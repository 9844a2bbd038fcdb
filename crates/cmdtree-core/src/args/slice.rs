//! Composite accessors over ranges of tokens.

use crate::errors::{fail, CommandResult};
use crate::invocation::Invocation;

impl Invocation {
    /// Tokens in the inclusive range `[index, final_index]`
    ///
    /// `final_index` defaults to the last token. Returns `None` when the range
    /// is out of bounds, reversed, or selects no tokens.
    pub fn array_slice(&self, index: usize, final_index: Option<usize>) -> Option<&[String]> {
        let args = self.args();
        let last = final_index.or_else(|| args.len().checked_sub(1))?;
        if index > last || last >= args.len() {
            return None;
        }
        Some(&args[index..=last])
    }

    /// Owned copy of [`array_slice`](Self::array_slice)
    pub fn list_slice(&self, index: usize, final_index: Option<usize>) -> Option<Vec<String>> {
        self.array_slice(index, final_index).map(<[String]>::to_vec)
    }

    /// All tokens joined with single spaces
    pub fn join(&self) -> String {
        self.args().join(" ")
    }

    /// Like [`join`](Self::join), aborting when no tokens were given
    ///
    /// # Errors
    ///
    /// Aborts with the node's usage line when the result is empty.
    pub fn required_join(&self) -> CommandResult<String> {
        let joined = self.join();
        if joined.is_empty() {
            return Err(fail(self.usage()));
        }
        Ok(joined)
    }

    /// Tokens in `[index, final_index]` joined with single spaces
    ///
    /// An invalid range yields an empty string.
    pub fn join_range(&self, index: usize, final_index: Option<usize>) -> String {
        self.array_slice(index, final_index)
            .map(|tokens| tokens.join(" "))
            .unwrap_or_default()
    }

    /// Like [`join_range`](Self::join_range), aborting when the result is empty
    ///
    /// # Errors
    ///
    /// Aborts with the node's usage line when no text was given.
    pub fn required_join_range(
        &self,
        index: usize,
        final_index: Option<usize>,
    ) -> CommandResult<String> {
        let joined = self.join_range(index, final_index);
        if joined.is_empty() {
            return Err(fail(self.usage()));
        }
        Ok(joined)
    }

    /// Remaining tokens from the cursor joined with single spaces
    ///
    /// Moves the cursor past the last token.
    pub fn rest(&mut self) -> String {
        let joined = self.join_range(self.cursor(), None);
        self.skip_to_end();
        joined
    }

    /// Like [`rest`](Self::rest), aborting when nothing remains
    ///
    /// # Errors
    ///
    /// Aborts with the node's usage line when no text remains.
    pub fn required_rest(&mut self) -> CommandResult<String> {
        let joined = self.rest();
        if joined.is_empty() {
            return Err(fail(self.usage()));
        }
        Ok(joined)
    }
}
