use crate::error::KvsError;
use crate::error::Result;
use crate::table::KeyValueTable;
use std::io::Write;

/// One line of a table script.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Set(String, String),
    Get(String),
    Remove(String),
}

/// Parse a script. Blank lines and `#` comments are skipped; line numbers in
/// errors start at 1.
pub fn parse(source: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (number, line) in source.lines().enumerate() {
        if let Some(command) = parse_line(line, number + 1)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

fn parse_line(line: &str, number: usize) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let error = |message: &str| KvsError::Parse {
        line: number,
        message: message.to_string(),
    };
    let (verb, rest) = split_word(line);
    if !matches!(verb, "set" | "get" | "rm") {
        return Err(error(&format!("unknown command `{}`", verb)));
    }
    let (key, rest) = split_word(rest);
    if key.is_empty() {
        return Err(error(&format!("`{}` needs a key", verb)));
    }

    let command = match verb {
        "set" => {
            if rest.is_empty() {
                return Err(error("`set` needs a value"));
            }
            Command::Set(key.to_string(), rest.to_string())
        }
        "get" | "rm" if !rest.is_empty() => {
            return Err(error(&format!("unexpected `{}` after key", rest)));
        }
        "get" => Command::Get(key.to_string()),
        _ => Command::Remove(key.to_string()),
    };
    Ok(Some(command))
}

fn split_word(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

/// Apply `commands` in order. Each `get` writes one line to `out`: the value,
/// or `Key not found`. A `rm` of a missing key also writes `Key not found`.
pub fn run<W: Write>(
    table: &mut KeyValueTable<String>,
    commands: Vec<Command>,
    out: &mut W,
) -> Result<()> {
    for command in commands {
        match command {
            Command::Set(key, value) => {
                table.set(key, value);
            }
            Command::Get(key) => match table.get(&key) {
                Some(value) => writeln!(out, "{}", value)?,
                None => writeln!(out, "Key not found")?,
            },
            Command::Remove(key) => match table.remove(&key) {
                Ok(_) => {}
                Err(KvsError::KeyNotFound) => writeln!(out, "Key not found")?,
                Err(err) => return Err(err),
            },
        }
    }
    out.flush()?;
    Ok(())
}
