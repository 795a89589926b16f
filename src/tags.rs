use crate::note::Note;

/// Normalize a search term: trimmed, lowercased, one leading `#` dropped.
pub fn normalize_query(term: &str) -> String {
    let trimmed = term.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed).to_lowercase()
}

/// Whole-tag, case-insensitive match against an already normalized query.
pub fn tags_match(tags: &[String], query: &str) -> bool {
    !query.is_empty() && tags.iter().any(|t| t.to_lowercase() == query)
}

pub fn note_has_tag(note: &Note, query: &str) -> bool {
    tags_match(&note.parsed().tags, &normalize_query(query))
}

/// Positions (in `notes`) of every note carrying `query`.
pub fn filter_by_tag(notes: &[Note], query: &str) -> Vec<usize> {
    let query = normalize_query(query);
    notes
        .iter()
        .enumerate()
        .filter(|(_, n)| tags_match(&n.parsed().tags, &query))
        .map(|(i, _)| i)
        .collect()
}

/// Hash a tag for deterministic color selection
pub fn hash_tag(tag: &str) -> u64 {
    let mut h: u64 = 5381;
    for b in tag.to_lowercase().bytes() {
        h = (h.wrapping_shl(5)).wrapping_add(h) ^ u64::from(b);
    }
    h
}

pub fn color_for_tag(tag: &str) -> (u8, u8, u8) {
    const PALETTE: &[(u8, u8, u8)] = &[
        (137, 180, 250),
        (166, 227, 161),
        (249, 226, 175),
        (245, 194, 231),
        (255, 169, 167),
        (148, 226, 213),
        (198, 160, 246),
        (240, 198, 198),
        (181, 232, 224),
        (183, 189, 248),
        (255, 214, 165),
        (196, 181, 255),
    ];
    PALETTE[(hash_tag(tag) as usize) % PALETTE.len()]
}
