//! Operator confirmation before any on-chain mutation.
//!
//! The gate blocks on operator input with no timeout. It is consumed when
//! asked, so a run can be confirmed only once, and the [`Confirmed`] token it
//! returns cannot be built anywhere else.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

#[derive(Debug, Error)]
pub enum ConfirmationError {
    #[error("Operator declined with '{0}'")]
    Declined(String),

    #[error("Operator input closed before confirmation")]
    Closed,

    #[error("Failed to read operator input: {0}")]
    Io(#[from] std::io::Error),
}

/// Proof that the operator approved this run.
#[derive(Debug)]
pub struct Confirmed {
    _private: (),
}

/// Reads a yes/no answer from the operator.
pub struct ConfirmationGate<R> {
    input: R,
}

impl ConfirmationGate<BufReader<Stdin>> {
    /// Gate reading from standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> ConfirmationGate<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Show `summary`, then wait for `y`/`yes`. Anything else aborts.
    pub async fn await_confirmation(mut self, summary: &str) -> Result<Confirmed, ConfirmationError> {
        println!("{}", summary);
        println!("Proceed? Type 'yes' to continue:");

        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            return Err(ConfirmationError::Closed);
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
            tracing::info!("Operator confirmed");
            Ok(Confirmed { _private: () })
        } else {
            Err(ConfirmationError::Declined(answer.to_string()))
        }
    }
}
