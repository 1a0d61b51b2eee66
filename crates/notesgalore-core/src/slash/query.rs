pub const TRIGGER_CHAR: char = '/';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashQuery {
    pub slash_index: usize,
    pub query: String,
}

impl SlashQuery {
    /// Byte range from the trigger through the end of the query.
    pub fn end(&self) -> usize {
        self.slash_index + TRIGGER_CHAR.len_utf8() + self.query.len()
    }
}

/// Finds the trigger the cursor is currently typing after, if any.
///
/// Walks back from the cursor to the nearest trigger. Whitespace on the way
/// means there is no query; the trigger itself must start the text or follow
/// whitespace.
pub fn find_slash_query(text: &str, cursor: usize) -> Option<SlashQuery> {
    let end = floor_char_boundary(text, cursor);
    let head = &text[..end];
    let (slash_index, _) = head
        .char_indices()
        .rev()
        .take_while(|(_, ch)| !ch.is_whitespace())
        .find(|(_, ch)| *ch == TRIGGER_CHAR)?;

    let starts_word = head[..slash_index]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace);
    if !starts_word {
        return None;
    }

    Some(SlashQuery {
        slash_index,
        query: head[slash_index + TRIGGER_CHAR.len_utf8()..].to_string(),
    })
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    (0..=offset.min(text.len()))
        .rev()
        .find(|&ix| text.is_char_boundary(ix))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{find_slash_query, SlashQuery};

    fn query(slash_index: usize, query: &str) -> Option<SlashQuery> {
        Some(SlashQuery {
            slash_index,
            query: query.to_string(),
        })
    }

    #[test]
    fn trigger_at_start_of_text() {
        assert_eq!(find_slash_query("/", 1), query(0, ""));
        assert_eq!(find_slash_query("/head", 5), query(0, "head"));
    }

    #[test]
    fn trigger_after_whitespace() {
        assert_eq!(find_slash_query("notes /to", 9), query(6, "to"));
    }

    #[test]
    fn trigger_inside_a_word_is_ignored() {
        assert_eq!(find_slash_query("and/or", 6), None);
        assert_eq!(find_slash_query("https://x", 9), None);
    }

    #[test]
    fn whitespace_in_query_closes() {
        assert_eq!(find_slash_query("/head ing", 9), None);
    }

    #[test]
    fn cursor_before_trigger_has_no_query() {
        assert_eq!(find_slash_query("ab /cd", 2), None);
        assert_eq!(find_slash_query("/cd", 0), None);
    }

    #[test]
    fn cursor_inside_multibyte_char_is_clamped() {
        assert_eq!(find_slash_query("/é", 2), query(0, ""));
        assert_eq!(find_slash_query("/é", 3), query(0, "é"));
    }

    #[test]
    fn nearest_trigger_wins() {
        assert_eq!(find_slash_query("/a /b", 5), query(3, "b"));
        assert_eq!(find_slash_query("/a/b", 4), None);
        assert_eq!(find_slash_query("", 3), None);
    }

    #[test]
    fn end_covers_trigger_and_query() {
        let found = find_slash_query("x /head", 7).expect("query");
        assert_eq!(found.end(), 7);
    }
}
