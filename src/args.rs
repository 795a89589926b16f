use std::error::Error;

use crate::tags::normalize_query;

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self { iter: args.into_iter(), command_name: command_name.to_string() }
    }

    /// Value after -t/--tag, normalized for matching.
    pub fn extract_tag(&mut self) -> Result<String, Box<dyn Error>> {
        let raw = self.extract_value("-t/--tag")?;
        let tag = normalize_query(&raw);
        if tag.is_empty() {
            return Err(format!("Invalid tag provided to {}", self.command_name).into());
        }
        Ok(tag)
    }

    pub fn extract_value(&mut self, flag: &str) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name).into()
        })
    }

    pub fn has_more(&self) -> bool {
        self.iter.len() > 0
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }

    pub fn collect_remaining(self) -> Vec<String> {
        self.iter.collect()
    }
}

/// Flags shared by the note commands. Each command rejects what it does not
/// understand through [`CommandFlags::expect_only`].
#[derive(Default, Debug)]
pub struct CommandFlags {
    pub tag: Option<String>,
    pub theme: Option<String>,
    pub plain: bool,
    pub yes: bool,
    pub positional: Vec<String>,
}

impl CommandFlags {
    pub fn parse(args: Vec<String>, command_name: &str) -> Result<Self, Box<dyn Error>> {
        let mut flags = Self::default();
        let mut parser = ArgParser::new(args, command_name);
        while let Some(arg) = parser.next() {
            match arg.as_str() {
                "-t" | "--tag" => flags.tag = Some(parser.extract_tag()?),
                "--theme" => flags.theme = Some(parser.extract_value("--theme")?),
                "--plain" => flags.plain = true,
                "-y" | "--yes" => flags.yes = true,
                "--" => {
                    flags.positional.extend(parser.collect_remaining());
                    break;
                }
                other if other.starts_with('-') && other.len() > 1 => {
                    return Err(format!("Unknown flag for {command_name}: {other}").into());
                }
                _ => flags.positional.push(arg),
            }
        }
        Ok(flags)
    }

    /// Fail if a flag outside `allowed` was given. Names as typed on the
    /// command line, e.g. `"--plain"`.
    pub fn expect_only(&self, allowed: &[&str], command_name: &str) -> Result<(), Box<dyn Error>> {
        let given = [
            ("--tag", self.tag.is_some()),
            ("--theme", self.theme.is_some()),
            ("--plain", self.plain),
            ("--yes", self.yes),
        ];
        for (name, set) in given {
            if set && !allowed.contains(&name) {
                return Err(format!("Unknown flag for {command_name}: {name}").into());
            }
        }
        Ok(())
    }

    /// The single optional positional argument.
    pub fn single(&self, command_name: &str) -> Result<Option<&str>, Box<dyn Error>> {
        match self.positional.as_slice() {
            [] => Ok(None),
            [one] => Ok(Some(one.as_str())),
            [_, extra, ..] => {
                Err(format!("Unexpected argument for {command_name}: {extra}").into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arg_parser_extract_tag() {
        let mut parser = ArgParser::new(strings(&["-t", "#Todo"]), "test");
        assert_eq!(parser.next().unwrap(), "-t");
        assert_eq!(parser.extract_tag().unwrap(), "todo");
        assert!(!parser.has_more());
    }

    #[test]
    fn test_arg_parser_missing_value() {
        let mut parser = ArgParser::new(strings(&["--theme"]), "spans");
        parser.next();
        let err = parser.extract_value("--theme").unwrap_err();
        assert_eq!(err.to_string(), "Provide a value after --theme for spans");
    }

    #[test]
    fn test_command_flags() {
        let flags =
            CommandFlags::parse(strings(&["3", "--plain", "-t", "work", "--theme", "Nord"]), "x")
                .unwrap();
        assert_eq!(flags.positional, vec!["3"]);
        assert!(flags.plain);
        assert_eq!(flags.tag.as_deref(), Some("work"));
        assert_eq!(flags.theme.as_deref(), Some("Nord"));
        assert!(!flags.yes);
    }

    #[test]
    fn test_unknown_flags_rejected() {
        assert!(CommandFlags::parse(strings(&["--bogus"]), "view").is_err());
        let flags = CommandFlags::parse(strings(&["1", "--yes"]), "view").unwrap();
        assert!(flags.expect_only(&["--plain"], "view").is_err());
        assert!(flags.expect_only(&["--yes"], "delete").is_ok());
    }

    #[test]
    fn test_double_dash_and_single() {
        let flags = CommandFlags::parse(strings(&["--", "-not-a-flag"]), "add").unwrap();
        assert_eq!(flags.positional, vec!["-not-a-flag"]);
        assert_eq!(flags.single("add").unwrap(), Some("-not-a-flag"));

        let flags = CommandFlags::parse(strings(&["1", "2"]), "view").unwrap();
        assert!(flags.single("view").is_err());
    }
}
