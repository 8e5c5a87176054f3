/// Transport-agnostic reply keyboard: rows of labelled buttons shown
/// under the user's input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
}

impl Keyboard {
    /// Lay `buttons` out `per_row` at a time, in order.
    pub fn from_buttons<S: AsRef<str>>(buttons: &[S], per_row: usize) -> Self {
        let rows = buttons
            .chunks(per_row.max(1))
            .map(|chunk| chunk.iter().map(|b| b.as_ref().to_string()).collect())
            .collect();
        Self { rows }
    }

    /// Append a full-width row.
    pub fn row<S: AsRef<str>>(mut self, buttons: &[S]) -> Self {
        self.rows
            .push(buttons.iter().map(|b| b.as_ref().to_string()).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_two_per_row() {
        let kb = Keyboard::from_buttons(&["a", "b", "c"], 2);
        assert_eq!(kb.rows, vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_appended_row_is_full_width() {
        let kb = Keyboard::from_buttons(&["a", "b"], 2).row(&["home"]);
        assert_eq!(kb.rows.len(), 2);
        assert_eq!(kb.rows[1], vec!["home"]);
    }
}
