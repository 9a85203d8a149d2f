use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::LevelFilter;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use plantuner::catalog::{Catalog, NameResolver};
use plantuner::common::types::{BlockNumber, ObjectId, RelKind};
use plantuner::config::{SettingsRegistry, TunerConfig};
use plantuner::query::parser::{split_qualified_name_list, QualifiedName};
use plantuner::query::planner::{get_relation_info, HookChain};
use plantuner::tuner::PlanTuner;

const HISTORY_FILE: &str = ".plantuner_history";

#[derive(Parser)]
#[command(author, version, about = "Plantuner shell - try index visibility overrides against an in-memory catalog")]
struct Cli {
    /// JSON file with startup values for the plantuner settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single command and exit
    #[arg(short = 'e', long)]
    command: Option<String>,

    /// Log debug output from the tuner
    #[arg(short, long)]
    verbose: bool,
}

/// One interactive session: a catalog, its settings and the planner hooks
struct Session {
    catalog: Arc<Catalog>,
    registry: SettingsRegistry,
    hooks: HookChain,
    _tuner: PlanTuner,
}

impl Session {
    fn new() -> Result<Self> {
        let catalog = Catalog::instance();
        let mut registry = SettingsRegistry::new();
        let mut hooks = HookChain::new();
        let tuner = PlanTuner::init(catalog.clone(), &mut registry, &mut hooks)
            .context("Failed to register plantuner settings")?;

        Ok(Session {
            catalog,
            registry,
            hooks,
            _tuner: tuner,
        })
    }

    /// Parse exactly one possibly qualified name
    fn parse_name(text: &str) -> Result<QualifiedName> {
        let mut names = split_qualified_name_list(text)?;
        if names.len() != 1 {
            bail!("expected a single name, got \"{}\"", text);
        }
        Ok(names.remove(0))
    }

    /// Parse a name that may not carry any qualifier, such as a schema name
    fn parse_unqualified(text: &str) -> Result<String> {
        let name = Self::parse_name(text)?;
        if name.schema.is_some() {
            bail!("\"{}\" must not be qualified", name);
        }
        Ok(name.name)
    }

    /// Parse the name of an object to create; a database qualifier must
    /// name this catalog's database
    fn parse_new_name(&self, text: &str) -> Result<QualifiedName> {
        let name = Self::parse_name(text)?;
        if let Some(database) = &name.catalog {
            if database != self.catalog.database_name() {
                bail!("cross-database references are not implemented: \"{}\"", name);
            }
        }
        Ok(name)
    }

    fn resolve(&self, text: &str) -> Result<ObjectId> {
        let name = Self::parse_name(text)?;
        self.catalog.resolve_qualified_name(&name)
            .ok_or_else(|| anyhow!("relation \"{}\" does not exist", name))
    }

    fn describe(&self, id: ObjectId) -> String {
        self.catalog.reverse_resolve(id)
            .map(|n| n.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    fn execute(&mut self, line: &str) -> Result<String> {
        let line = line.trim().trim_end_matches(';').trim();
        let (keyword, rest) = split_word(line);

        match keyword.to_ascii_uppercase().as_str() {
            "CREATE" => self.create(rest),
            "DROP" => {
                // DROP TABLE|INDEX|VIEW <name>
                let (object, name) = split_word(rest);
                let expected = match object.to_ascii_uppercase().as_str() {
                    "TABLE" => RelKind::Table,
                    "INDEX" => RelKind::Index,
                    "VIEW" => RelKind::View,
                    other => bail!("cannot drop \"{}\"", other),
                };
                let id = self.resolve(name)?;
                match self.catalog.object_kind(id) {
                    Some(kind) if kind == expected => {}
                    Some(kind) => bail!("\"{}\" is a {}, not a {}", name.trim(), kind, expected),
                    None => bail!("relation \"{}\" does not exist", name.trim()),
                }
                self.catalog.drop_relation(id)?;
                Ok(format!("DROP {}", expected.to_string().to_ascii_uppercase()))
            }
            "ALTER" => {
                // ALTER TABLE <name> BLOCKS <n>
                let (_, rest) = split_word(rest);
                let (name, rest) = split_word(rest);
                let (blocks_kw, count) = split_word(rest);
                if !blocks_kw.eq_ignore_ascii_case("BLOCKS") {
                    bail!("expected ALTER TABLE <name> BLOCKS <n>");
                }
                let blocks: BlockNumber = count.trim().parse().context("invalid block count")?;
                let id = self.resolve(name)?;
                self.catalog.set_block_count(id, blocks)?;
                Ok("ALTER TABLE".to_string())
            }
            "SET" => {
                let (name, value) = split_assignment(rest)?;
                if name.eq_ignore_ascii_case("search_path") {
                    let mut path = Vec::new();
                    for name in split_qualified_name_list(&value)? {
                        if name.schema.is_some() {
                            bail!("search_path entry \"{}\" must be a schema name", name);
                        }
                        path.push(name.name);
                    }
                    self.catalog.set_search_path(path);
                } else {
                    self.registry.set(&name, &value)?;
                }
                Ok("SET".to_string())
            }
            "SHOW" => {
                let name = rest.trim();
                if name.eq_ignore_ascii_case("ALL") {
                    Ok(self.registry.describe()
                        .into_iter()
                        .map(|d| format!("{} = '{}'  -- {}", d.name, d.setting, d.short_desc))
                        .collect::<Vec<_>>()
                        .join("\n"))
                } else if name.eq_ignore_ascii_case("search_path") {
                    Ok(self.catalog.search_path().join(", "))
                } else {
                    Ok(self.registry.show(name)?)
                }
            }
            "RESET" => {
                let name = rest.trim();
                if name.eq_ignore_ascii_case("ALL") {
                    self.registry.reset_all()?;
                } else {
                    self.registry.reset(name)?;
                }
                Ok("RESET".to_string())
            }
            "PLAN" => self.plan(rest),
            _ => bail!("unrecognized command \"{}\"; type 'help' for the list", keyword),
        }
    }

    fn create(&mut self, rest: &str) -> Result<String> {
        let (object, rest) = split_word(rest);
        match object.to_ascii_uppercase().as_str() {
            "SCHEMA" => {
                let name = Self::parse_unqualified(rest)?;
                self.catalog.create_schema(&name)?;
                Ok("CREATE SCHEMA".to_string())
            }
            "TABLE" => {
                let (name, rest) = split_word(rest);
                let name = self.parse_new_name(name)?;
                let id = self.catalog.create_table(name.schema.as_deref(), &name.name)?;
                let (blocks_kw, count) = split_word(rest);
                if blocks_kw.eq_ignore_ascii_case("BLOCKS") {
                    let blocks: BlockNumber = count.trim().parse().context("invalid block count")?;
                    self.catalog.set_block_count(id, blocks)?;
                }
                Ok("CREATE TABLE".to_string())
            }
            "VIEW" => {
                let name = self.parse_new_name(rest)?;
                self.catalog.create_view(name.schema.as_deref(), &name.name)?;
                Ok("CREATE VIEW".to_string())
            }
            "INDEX" => {
                // CREATE INDEX <name> ON <table>
                let (name, rest) = split_word(rest);
                let (on_kw, table) = split_word(rest);
                if !on_kw.eq_ignore_ascii_case("ON") {
                    bail!("expected CREATE INDEX <name> ON <table>");
                }
                let name = self.parse_new_name(name)?;
                let table_id = self.resolve(table)?;
                // The index always lives in its table's schema
                if let Some(schema) = &name.schema {
                    let table_schema = self.catalog.reverse_resolve(table_id).and_then(|n| n.schema);
                    if table_schema.as_ref() != Some(schema) {
                        bail!("index \"{}\" must be created in the schema of table \"{}\"", name, table.trim());
                    }
                }
                self.catalog.create_index(&name.name, table_id)?;
                Ok("CREATE INDEX".to_string())
            }
            other => bail!("cannot create \"{}\"", other),
        }
    }

    fn plan(&self, rest: &str) -> Result<String> {
        let id = self.resolve(rest)?;
        let rel = get_relation_info(&self.catalog, &self.hooks, id, false)?;

        let indexes: Vec<String> = rel.index_ids().into_iter().map(|i| self.describe(i)).collect();
        Ok(format!(
            "relation: {}\npages: {}\ntuples: {}\nindexes: {}",
            self.describe(id),
            rel.pages,
            rel.tuples,
            if indexes.is_empty() { "(none)".to_string() } else { indexes.join(", ") },
        ))
    }
}

/// Split off the first whitespace-separated word
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], text[pos..].trim_start()),
        None => (text, ""),
    }
}

/// Parse `name = value` or `name TO value`, unquoting a single-quoted value
fn split_assignment(text: &str) -> Result<(String, String)> {
    let (name, rest) = match text.find('=') {
        Some(pos) => (text[..pos].trim(), text[pos + 1..].trim()),
        None => {
            let (name, rest) = split_word(text);
            let (to_kw, value) = split_word(rest);
            if !to_kw.eq_ignore_ascii_case("TO") {
                bail!("expected SET <name> = <value>");
            }
            (name, value.trim())
        }
    };
    if name.is_empty() {
        bail!("missing parameter name");
    }
    Ok((name.to_string(), unquote_literal(rest)?))
}

fn unquote_literal(value: &str) -> Result<String> {
    let Some(inner) = value.strip_prefix('\'') else {
        return Ok(value.to_string());
    };
    let inner = inner.strip_suffix('\'').ok_or_else(|| anyhow!("unterminated quoted string"))?;
    Ok(inner.replace("''", "'"))
}

fn run_shell(session: &mut Session) -> Result<()> {
    println!("Plantuner shell. Type 'help' for assistance or 'exit' to quit.");

    let mut rl = Editor::<(), DefaultHistory>::new()?;
    if let Err(err) = rl.load_history(HISTORY_FILE) {
        if !err.to_string().contains("No such file or directory") {
            println!("Error loading history: {}", err);
        }
    }

    loop {
        match rl.readline("plantuner> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match line.to_lowercase().as_str() {
                    "exit" | "quit" | "\\q" => break,
                    "help" => print!("{}", help_text()),
                    _ => match session.execute(line) {
                        Ok(output) => println!("{}", output),
                        Err(err) => println!("ERROR: {}", err),
                    },
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(HISTORY_FILE) {
        println!("Error saving history: {}", err);
    }
    Ok(())
}

fn help_text() -> String {
    [
        "Catalog:",
        "  CREATE SCHEMA <name>",
        "  CREATE TABLE <name> [BLOCKS <n>]",
        "  CREATE INDEX <name> ON <table>",
        "  CREATE VIEW <name>",
        "  ALTER TABLE <name> BLOCKS <n>",
        "  DROP TABLE|INDEX|VIEW <name>",
        "",
        "Settings:",
        "  SET plantuner.disable_index = 'idx_a, idx_b'",
        "  SET plantuner.enable_index = 'idx_b'",
        "  SET plantuner.fix_empty_table = on",
        "  SET search_path = app, public",
        "  SHOW <name> | SHOW ALL",
        "  RESET <name> | RESET ALL",
        "",
        "Planning:",
        "  PLAN <table>                  - Show candidate indexes and estimates",
        "",
        "  help                          - Display this help message",
        "  exit                          - Exit the shell",
    ]
    .iter()
    .map(|line| format!("{}\n", line))
    .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_module("plantuner", if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn })
        .init();

    let mut session = Session::new()?;

    if let Some(path) = &cli.config {
        TunerConfig::load(path)
            .and_then(|config| config.apply(&mut session.registry))
            .with_context(|| format!("Failed to apply configuration from {}", path.display()))?;
    }

    match &cli.command {
        Some(command) => {
            let output = session.execute(command)?;
            println!("{}", output);
        }
        None => run_shell(&mut session)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let catalog = Arc::new(Catalog::new());
        let mut registry = SettingsRegistry::new();
        let mut hooks = HookChain::new();
        let tuner = PlanTuner::init(catalog.clone(), &mut registry, &mut hooks).unwrap();
        Session { catalog, registry, hooks, _tuner: tuner }
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(
            split_assignment("plantuner.enable_index = 'a, \"B\"'").unwrap(),
            ("plantuner.enable_index".to_string(), "a, \"B\"".to_string())
        );
        assert_eq!(
            split_assignment("x TO 'it''s'").unwrap(),
            ("x".to_string(), "it's".to_string())
        );
        assert!(split_assignment("x 'y'").is_err());
        assert!(unquote_literal("'open").is_err());
    }

    #[test]
    fn test_session_plan() {
        let mut s = session();
        s.execute("CREATE TABLE t BLOCKS 3").unwrap();
        s.execute("CREATE INDEX idx_a ON t").unwrap();
        s.execute("CREATE INDEX idx_b ON t").unwrap();
        s.execute("SET plantuner.disable_index = 'idx_a, idx_b'").unwrap();
        s.execute("SET plantuner.enable_index TO 'idx_b';").unwrap();

        let out = s.execute("PLAN t").unwrap();
        assert!(out.contains("indexes: public.idx_b"), "{}", out);
        assert_eq!(s.execute("SHOW plantuner.forbid_index").unwrap(), "public.idx_a, public.idx_b");
    }

    #[test]
    fn test_session_errors() {
        let mut s = session();
        assert!(s.execute("PLAN missing").is_err());
        assert!(s.execute("FROB x").is_err());
        assert!(s.execute("SET plantuner.disable_index = '\"open'").is_err());
    }

    #[test]
    fn test_help_command_content() {
        let help = help_text();
        for command in ["CREATE INDEX <name> ON <table>", "DROP TABLE|INDEX|VIEW <name>", "SHOW ALL", "PLAN <table>", "exit"] {
            assert!(help.contains(command), "missing {}", command);
        }
    }

    #[test]
    fn test_create_index_schema_must_match_table() {
        let mut s = session();
        s.execute("CREATE SCHEMA other").unwrap();
        s.execute("CREATE TABLE t").unwrap();

        assert!(s.execute("CREATE INDEX other.i ON t").is_err());
        assert_eq!(s.catalog.lookup(&QualifiedName::qualified("public", "i")), None);
        assert!(s.execute("CREATE INDEX other_db.public.i ON t").is_err());

        assert_eq!(s.execute("CREATE INDEX public.i ON t").unwrap(), "CREATE INDEX");
        assert!(s.catalog.lookup(&QualifiedName::qualified("public", "i")).is_some());
    }

    #[test]
    fn test_drop_checks_object_kind() {
        let mut s = session();
        s.execute("CREATE TABLE t").unwrap();
        s.execute("CREATE INDEX j ON t").unwrap();

        assert!(s.execute("DROP TABLE j").is_err());
        assert!(s.catalog.lookup(&QualifiedName::unqualified("j")).is_some());
        assert!(s.execute("DROP SEQUENCE j").is_err());

        assert_eq!(s.execute("DROP INDEX j").unwrap(), "DROP INDEX");
        assert_eq!(s.catalog.lookup(&QualifiedName::unqualified("j")), None);
        assert_eq!(s.execute("DROP TABLE t").unwrap(), "DROP TABLE");
    }

    #[test]
    fn test_schema_names_must_be_unqualified() {
        let mut s = session();
        assert!(s.execute("CREATE SCHEMA a.b").is_err());
        assert!(s.catalog.create_schema("b").is_ok());

        assert!(s.execute("SET search_path = a.b, public").is_err());
        assert_eq!(s.execute("SHOW search_path").unwrap(), "public");

        s.execute("SET search_path TO b, public").unwrap();
        assert_eq!(s.execute("SHOW search_path").unwrap(), "b, public");
    }
}
