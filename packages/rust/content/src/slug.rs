//! Title → URL slug.

/// Lowercase ASCII slug of `title`.
///
/// Characters are transliterated with `deunicode`, letters and digits are
/// kept, `&` reads as "and", whitespace, `-` and `_` separate words, and
/// everything else is dropped. Runs of separators collapse into one `-`.
pub fn slugify(title: &str) -> String {
    let mut output = String::with_capacity(title.len());
    let mut need_dash = false;

    for ch in title.chars() {
        if ch == '&' {
            push_word(&mut output, &mut need_dash, "and");
            need_dash = true;
            continue;
        }

        for b in deunicode::deunicode_char(ch).unwrap_or(" ").bytes() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => {
                    if need_dash {
                        output.push('-');
                        need_dash = false;
                    }
                    output.push(b.to_ascii_lowercase() as char);
                }
                b' ' | b'\t' | b'\n' | b'\r' | b'-' | b'_' => {
                    need_dash = !output.is_empty();
                }
                _ => {}
            }
        }
    }

    output
}

fn push_word(output: &mut String, need_dash: &mut bool, word: &str) {
    if !output.is_empty() {
        output.push('-');
    }
    output.push_str(word);
    *need_dash = false;
}
