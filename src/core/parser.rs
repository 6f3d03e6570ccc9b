use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected EOF while looking for matching `{0}'")]
    UnterminatedQuote(char),
    #[error("unexpected EOF after escape character")]
    TrailingEscape,
}

/// One parsed input line: the command word plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
    pub raw_line: String,
}

impl Command {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.args.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Splits `line` into words.
///
/// Whitespace separates words outside quotes. Single quotes keep everything
/// literally; inside double quotes a backslash only escapes `"` or `\`;
/// outside quotes a backslash takes the next character literally. Quoted and
/// unquoted segments that touch form a single word, and `''` is an empty word.
pub fn split_words(line: &str) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote = Quote::None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Quote::Single => {
                if c == '\'' {
                    quote = Quote::None;
                } else {
                    current.push(c);
                }
            }
            Quote::Double => match c {
                '"' => quote = Quote::None,
                '\\' => match chars.peek() {
                    Some(&next) if next == '"' || next == '\\' => {
                        chars.next();
                        current.push(next);
                    }
                    _ => current.push(c),
                },
                _ => current.push(c),
            },
            Quote::None => match c {
                '\'' => {
                    quote = Quote::Single;
                    in_word = true;
                }
                '"' => {
                    quote = Quote::Double;
                    in_word = true;
                }
                '\\' => {
                    let next = chars.next().ok_or(ParseError::TrailingEscape)?;
                    current.push(next);
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    match quote {
        Quote::Single => return Err(ParseError::UnterminatedQuote('\'')),
        Quote::Double => return Err(ParseError::UnterminatedQuote('"')),
        Quote::None => {}
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Tokenizes a raw line into a [`Command`]. A blank line yields a command
/// with an empty name.
pub fn tokenize(line: &str) -> Result<Command, ParseError> {
    let mut words = split_words(line)?.into_iter();
    let name = words.next().unwrap_or_default();

    Ok(Command {
        name,
        args: words.collect(),
        raw_line: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        split_words(line).expect("line should parse")
    }

    #[test]
    fn test_plain_words() {
        let cmd = tokenize("echo a   b\tc").expect("parse");
        assert_eq!(cmd.name, "echo");
        assert_eq!(cmd.args, vec!["a", "b", "c"]);
        assert_eq!(cmd.raw_line, "echo a   b\tc");
    }

    #[test]
    fn test_blank_line_is_empty() {
        assert!(tokenize("").expect("parse").is_empty());
        assert!(tokenize("   \t ").expect("parse").is_empty());
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(words("echo 'a   b'"), vec!["echo", "a   b"]);
        assert_eq!(words(r"echo 'a\nb\'"), vec!["echo", r"a\nb\"]);
        assert_eq!(words("echo '\"hi\"'"), vec!["echo", "\"hi\""]);
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(words(r#"echo "a\"b""#), vec!["echo", "a\"b"]);
        assert_eq!(words(r#"echo "a\\b""#), vec!["echo", r"a\b"]);
        assert_eq!(words(r#"echo "a\nb""#), vec!["echo", r"a\nb"]);
        assert_eq!(words(r#"echo "it's  here""#), vec!["echo", "it's  here"]);
    }

    #[test]
    fn test_backslash_outside_quotes() {
        assert_eq!(words(r"echo a\ \ b"), vec!["echo", "a  b"]);
        assert_eq!(words(r"echo \'x\'"), vec!["echo", "'x'"]);
        assert_eq!(words(r"echo \n"), vec!["echo", "n"]);
    }

    #[test]
    fn test_adjacent_segments_join() {
        assert_eq!(words(r#"echo 'a'"b"c"#), vec!["echo", "abc"]);
        assert_eq!(words("echo 'x' 'y'"), vec!["echo", "x", "y"]);
    }

    #[test]
    fn test_empty_quotes_make_empty_word() {
        assert_eq!(words("echo '' \"\""), vec!["echo", "", ""]);
    }

    #[test]
    fn test_quoted_command_name() {
        let cmd = tokenize("'my prog' arg").expect("parse");
        assert_eq!(cmd.name, "my prog");
        assert_eq!(cmd.args, vec!["arg"]);
    }

    #[test]
    fn test_unterminated_quotes() {
        assert_eq!(
            tokenize("echo 'abc"),
            Err(ParseError::UnterminatedQuote('\''))
        );
        assert_eq!(
            tokenize("echo \"abc"),
            Err(ParseError::UnterminatedQuote('"'))
        );
        assert_eq!(tokenize("echo abc\\"), Err(ParseError::TrailingEscape));
    }
}
