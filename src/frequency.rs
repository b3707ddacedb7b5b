//! Byte frequency counting and ranking.
//!
//! Counts cover the single-byte range `0..=254`. Alphabet symbols outside that
//! range are never counted, so ranking is only meaningful for byte-sized
//! alphabets such as the default `a..z`.

use std::io::BufRead;

use serde::Serialize;

use crate::alphabet::Alphabet;

/// Number of distinct byte values tracked.
pub const SYMBOL_RANGE: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolCount {
    pub symbol: u8,
    pub count: u64,
}

impl SymbolCount {
    pub fn as_char(&self) -> char {
        self.symbol as char
    }
}

/// Accumulates symbol counts over any number of sources.
pub struct FrequencyCounter<'a> {
    counts: [u64; SYMBOL_RANGE],
    fold_case: bool,
    include: Box<dyn Fn(u8) -> bool + 'a>,
}

impl<'a> FrequencyCounter<'a> {
    /// Counts every byte.
    pub fn new(fold_case: bool) -> Self {
        Self::with_filter(fold_case, |_| true)
    }

    /// Counts only bytes between the smallest and largest symbol of the alphabet.
    pub fn for_alphabet(alphabet: &Alphabet, fold_case: bool) -> Self {
        let (min, max) = alphabet.symbol_range();
        let (min, max) = (min as u32, max as u32);
        Self::with_filter(fold_case, move |b| (min..=max).contains(&(b as u32)))
    }

    pub fn with_filter(fold_case: bool, include: impl Fn(u8) -> bool + 'a) -> Self {
        Self {
            counts: [0; SYMBOL_RANGE],
            fold_case,
            include: Box::new(include),
        }
    }

    pub fn count_text(&mut self, text: &str) {
        self.count_bytes(text.as_bytes());
    }

    pub fn count_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            let b = if self.fold_case { b.to_ascii_lowercase() } else { b };
            if (b as usize) < SYMBOL_RANGE && (self.include)(b) {
                self.counts[b as usize] += 1;
            }
        }
    }

    /// Drains the reader, counting everything it yields.
    pub fn count_reader<R: BufRead>(&mut self, mut reader: R) -> std::io::Result<()> {
        loop {
            let len = {
                let buf = reader.fill_buf()?;
                self.count_bytes(buf);
                buf.len()
            };
            if len == 0 {
                return Ok(());
            }
            reader.consume(len);
        }
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts.get(symbol as usize).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Every tracked symbol, most frequent first. The sort is stable, so symbols
    /// with equal counts stay in ascending byte order.
    pub fn ranked(&self) -> Vec<SymbolCount> {
        let mut ranked: Vec<SymbolCount> = self
            .counts
            .iter()
            .enumerate()
            .map(|(symbol, &count)| SymbolCount {
                symbol: symbol as u8,
                count,
            })
            .collect();
        ranked.sort_by(|l, r| r.count.cmp(&l.count));
        ranked
    }

    /// Alphabet positions of the observed symbols, most frequent first.
    /// Symbols that never occurred or lie outside the alphabet are skipped.
    pub fn ranked_positions(&self, alphabet: &Alphabet) -> Vec<usize> {
        self.ranked()
            .into_iter()
            .take_while(|s| s.count > 0)
            .filter_map(|s| alphabet.index_of(s.as_char()))
            .collect()
    }

    pub fn report(&self) -> FrequencyReport {
        let total = self.total();
        let rows = self
            .ranked()
            .into_iter()
            .take_while(|s| s.count > 0)
            .map(|s| FrequencyRow {
                symbol: s.symbol,
                count: s.count,
                percent: s.count as f64 / total as f64 * 100.0,
            })
            .collect();
        FrequencyReport { total, rows }
    }
}

impl Default for FrequencyCounter<'_> {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Occurrences and share of the total for every symbol seen.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyReport {
    pub total: u64,
    pub rows: Vec<FrequencyRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrequencyRow {
    pub symbol: u8,
    pub count: u64,
    pub percent: f64,
}

/// Relative frequency of every alphabet position in `positions`.
pub fn relative_frequencies(positions: &[usize], n: usize) -> Vec<f64> {
    let mut counts = vec![0usize; n];
    for &p in positions {
        counts[p] += 1;
    }
    if positions.is_empty() {
        return vec![0.0; n];
    }
    counts
        .into_iter()
        .map(|c| c as f64 / positions.len() as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ties_keep_ascending_symbol_order() {
        let mut counter = FrequencyCounter::new(false);
        counter.count_text("cbacb");

        let top: Vec<(char, u64)> = counter
            .ranked()
            .into_iter()
            .take(3)
            .map(|s| (s.as_char(), s.count))
            .collect();
        assert_eq!(top, vec![('b', 2), ('c', 2), ('a', 1)]);
    }

    #[test]
    fn ranks_every_byte_value() {
        let counter = FrequencyCounter::new(false);
        let ranked = counter.ranked();
        assert_eq!(ranked.len(), SYMBOL_RANGE);
        assert_eq!(ranked[0].symbol, 0);
        assert_eq!(ranked[254].symbol, 254);
    }

    #[test]
    fn alphabet_filter_skips_punctuation_and_folds_case() {
        let alphabet = Alphabet::english();
        let mut counter = FrequencyCounter::for_alphabet(&alphabet, true);
        counter.count_text("Hello, World!");

        assert_eq!(counter.count(b'l'), 3);
        assert_eq!(counter.count(b'h'), 1);
        assert_eq!(counter.count(b'H'), 0);
        assert_eq!(counter.count(b','), 0);
        assert_eq!(counter.total(), 10);
    }

    #[test]
    fn without_folding_uppercase_is_outside_the_range() {
        let alphabet = Alphabet::english();
        let mut counter = FrequencyCounter::for_alphabet(&alphabet, false);
        counter.count_text("AAb");
        assert_eq!(counter.total(), 1);
    }

    #[test]
    fn reader_and_text_sources_accumulate() {
        let mut counter = FrequencyCounter::new(false);
        counter.count_text("aa");
        counter
            .count_reader(Cursor::new("ab\nb".as_bytes()))
            .unwrap();

        assert_eq!(counter.count(b'a'), 3);
        assert_eq!(counter.count(b'b'), 2);
        assert_eq!(counter.count(b'\n'), 1);
    }

    #[test]
    fn ranked_positions_only_lists_observed_symbols() {
        let alphabet = Alphabet::english();
        let mut counter = FrequencyCounter::for_alphabet(&alphabet, true);
        counter.count_text("zzzyya");
        assert_eq!(counter.ranked_positions(&alphabet), vec![25, 24, 0]);
    }

    #[test]
    fn report_percentages_sum_to_one_hundred() {
        let mut counter = FrequencyCounter::new(false);
        counter.count_text("aab ");
        let report = counter.report();

        assert_eq!(report.total, 4);
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].symbol, b'a');
        let sum: f64 = report.rows.iter().map(|r| r.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn relative_frequencies_of_empty_column_are_zero() {
        assert_eq!(relative_frequencies(&[], 3), vec![0.0; 3]);
        assert_eq!(relative_frequencies(&[0, 0, 2, 1], 3), vec![0.5, 0.25, 0.25]);
    }
}
