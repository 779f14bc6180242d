//! The safety-critical surface of the whole tool: every byte of user
//! data that ends up inside the generated script goes through here (or
//! through the runtime quoting the script itself performs, which
//! `script` emits). Quoting is delegated to `shlex` rather than done
//! by hand.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unbalanced quoting in {0:?}")]
    Unsplittable(String),
    #[error("can't embed {0:?} in a script (contains a NUL byte)")]
    Unquotable(String),
}

/// Split a record line into words the way a POSIX shell would:
/// whitespace-delimited, honoring single quotes, double quotes and
/// backslash escapes. This is the tool's documented splitting rule;
/// a line with e.g. an unterminated quote is rejected.
pub fn split_words(line: &str) -> Result<Vec<String>, Error> {
    shlex::split(line).ok_or_else(|| Error::Unsplittable(line.to_owned()))
}

/// Quote a single token so the shell reads it back as exactly one word.
pub fn quote(token: &str) -> Result<String, Error> {
    let quoted = shlex::try_quote(token).map_err(|_| Error::Unquotable(token.to_owned()))?;
    Ok(quoted.into_owned())
}

/// Encode one record line for embedding: split it into words, re-quote
/// each word, and join with single spaces. Splitting the result again
/// reproduces the original tokenization byte for byte.
pub fn requote_line(line: &str) -> Result<String, Error> {
    let words = split_words(line)?;
    let quoted: Result<Vec<String>, Error> = words.iter().map(|w| quote(w)).collect();
    Ok(quoted?.join(" "))
}
