//! keycalc Calc - Keypad calculator and history
//!
//! [`Calculator`] turns key presses into display text the way a pocket
//! calculator does: operators chain left to right, `=` finishes the pending
//! operation, and failures show `"Error"` instead of panicking.
//! Finished calculations go to a [`HistorySink`], normally a [`History`].

mod calculator;
mod history;
mod key;

pub use calculator::{Calculator, Mode, UnknownMode, ERROR_DISPLAY};
pub use history::{History, HistoryEntry, HistorySink};
pub use key::{Key, UnknownKey};

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that only counts, to show the calculator does not need `History`
    #[derive(Default)]
    struct CountingSink(usize);

    impl HistorySink for CountingSink {
        fn add_to_history(&mut self, _entry: HistoryEntry) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_custom_sink() {
        let mut calc = Calculator::default();
        let mut sink = CountingSink::default();
        for key in [Key::Digit(1), Key::Op(keycalc_expr::BinOp::Add), Key::Digit(2), Key::Equals] {
            calc.press(key, &mut sink);
        }
        assert_eq!(calc.display(), "3");
        assert_eq!(sink.0, 1);
    }
}
