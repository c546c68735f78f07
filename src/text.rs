pub const MIN_TOKEN_LEN: usize = 3;

pub fn fold_diacritics(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'Ñ' => 'N',
            _ => ch,
        })
        .collect()
}

pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_token(input: &str) -> String {
    let folded = fold_diacritics(&input.to_lowercase());
    let spaced: String = folded
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { ' ' })
        .collect();
    collapse_whitespace(&spaced)
}

pub fn tokenize(input: &str) -> Vec<String> {
    normalize_token(input)
        .split(' ')
        .filter(|word| word.len() >= MIN_TOKEN_LEN)
        .map(|word| word.to_string())
        .collect()
}

pub fn normalize_hashtag(tag: &str) -> String {
    let mut value = fold_diacritics(&tag.trim().to_lowercase());
    if !value.starts_with('#') {
        value = format!("#{}", value);
    }
    value
        .chars()
        .filter(|ch| *ch == '#' || ch.is_ascii_alphanumeric() || *ch == '_')
        .collect()
}

pub fn hashtag_from_token(token: &str) -> Option<String> {
    let cleaned: String = fold_diacritics(&token.to_lowercase())
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Some(format!("#{}", cleaned))
}

// The character set accepted in recommendation/reason/idea text: Latin letters
// with Spanish accents, digits, whitespace, and basic punctuation.
fn is_allowed_char(ch: char) -> bool {
    if ch.is_ascii_alphanumeric() || ch.is_whitespace() {
        return true;
    }
    matches!(
        ch,
        '¿' | '?'
            | '¡'
            | '!'
            | '.'
            | ','
            | ';'
            | ':'
            | '('
            | ')'
            | '-'
            | '_'
            | '/'
            | '"'
            | '\''
            | 'á'
            | 'é'
            | 'í'
            | 'ó'
            | 'ú'
            | 'Á'
            | 'É'
            | 'Í'
            | 'Ó'
            | 'Ú'
            | 'ñ'
            | 'Ñ'
    )
}

pub fn strip_disallowed(input: &str) -> String {
    input.chars().filter(|ch| is_allowed_char(*ch)).collect()
}

pub fn sanitize_line(input: &str) -> String {
    collapse_whitespace(&strip_disallowed(input))
}

// Like sanitize_line but keeps line breaks, so bullet structure survives.
pub fn sanitize_block(input: &str) -> String {
    strip_disallowed(input)
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
