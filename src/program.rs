use crate::error::ParseError;

/// Parses comma separated program text, e.g. `1,9,10,3,2,3,11,0,99,30,40,50`.
/// Whitespace around values and a trailing comma are accepted.
pub fn parse(text: &str) -> Result<Vec<i64>, ParseError> {
    let text = text.trim();
    let text = text.strip_suffix(',').unwrap_or(text);
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .enumerate()
        .map(|(index, token)| {
            let token = token.trim();
            token.parse().map_err(|source| ParseError {
                index,
                token: token.to_owned(),
                source,
            })
        })
        .collect()
}
