/// Character n-grams inside word boundaries.
///
/// Each whitespace-separated word is padded with one space on both sides and
/// every n-gram of length `min_n..=max_n` is emitted, left to right. A padded
/// word shorter than `n` is emitted once, whole, and longer n are skipped.
pub fn char_wb_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let mut out = Vec::new();
    for word in text.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ').chain(word.chars()).chain(std::iter::once(' ')).collect();
        let len = padded.len();
        for n in min_n..=max_n {
            let mut offset = 0;
            out.push(padded[offset..(offset + n).min(len)].iter().collect());
            while offset + n < len {
                offset += 1;
                out.push(padded[offset..offset + n].iter().collect());
            }
            if offset == 0 { break; }
        }
    }
    out
}
