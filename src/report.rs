use cipherbreak::affine::AffineCandidate;
use cipherbreak::frequency::FrequencyReport;
use cipherbreak::vigenere::VigenereCandidate;
use cipherbreak::Alphabet;

pub fn affine_table(ciphertext: &str, candidates: &[AffineCandidate]) -> String {
    let mut out = String::from("Possible translations for first line of text\n");
    out.push_str(&format!("{:>3}{:>3} | {}\n", "a", "b", ciphertext));
    out.push_str(&format!(
        "{}|{}\n",
        "-".repeat(7),
        "-".repeat(ciphertext.chars().count() + 1)
    ));
    for candidate in candidates {
        out.push_str(&format!(
            "{:>3}{:>3} | {}\n",
            candidate.a(),
            candidate.b(),
            candidate.plaintext
        ));
    }
    if candidates.is_empty() {
        out.push_str("No key fits the ciphertext\n");
    }
    out
}

pub fn vigenere_keys(candidates: &[VigenereCandidate], alphabet: &Alphabet) -> String {
    if candidates.is_empty() {
        return "No key length stands out, try more ciphertext\n".to_string();
    }
    candidates
        .iter()
        .map(|candidate| {
            format!(
                "Potential key: {} (length {}, {} coincidences)\n",
                candidate.key.render(alphabet, '?'),
                candidate.length,
                candidate.matches
            )
        })
        .collect()
}

pub fn frequency_table(report: &FrequencyReport) -> String {
    let line = "-".repeat(50);
    let mut out = format!("{line}\n{} total characters read\n{line}\n\n", report.total);
    for row in &report.rows {
        let shown = if row.symbol > b' ' && row.symbol < 0x7f { row.symbol as char } else { ' ' };
        out.push_str(&format!(
            "\t {}  ({:>4})\t{:>10}\t{:.5}%\n",
            shown, row.symbol, row.count, row.percent
        ));
    }
    out
}
