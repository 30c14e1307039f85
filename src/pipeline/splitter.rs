pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    debug_assert!(max_chars >= 1);

    if char_count(text) <= max_chars {
        return vec![text.to_string()];
    }

    let mut parts = Vec::new();
    let mut rest = text;

    loop {
        let window_end = match rest.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => byte_idx,
            None => {
                // remainder fits in one piece
                parts.push(rest.to_string());
                break;
            }
        };

        let window = &rest[..window_end];
        let cut = cut_point(window);
        parts.push(window[..cut].to_string());
        rest = &rest[cut..];
    }

    parts
}

// The candidate with the largest index wins; declaration order only breaks
// ties between equal indices. The delimiter stays inside the emitted piece,
// so concatenating the pieces reproduces the input byte for byte.
fn cut_point(window: &str) -> usize {
    let candidates = [
        (window.rfind(". "), 2),
        (window.rfind("! "), 2),
        (window.rfind("? "), 2),
        (window.rfind('\n'), 1),
        (window.rfind(' '), 1),
    ];

    let mut best: Option<(usize, usize)> = None;
    for (idx, len) in candidates {
        if let Some(idx) = idx {
            if best.map_or(true, |(best_idx, _)| idx > best_idx) {
                best = Some((idx, len));
            }
        }
    }

    match best {
        Some((idx, len)) => idx + len,
        None => window.len(),
    }
}
