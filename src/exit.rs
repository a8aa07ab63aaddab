//! Process exit statuses for the command-line tools

use crate::accrual::AccrualError;
use crate::ledger::LedgerError;

/// Status for failures without a dedicated code
pub const GENERIC_FAILURE: u8 = 1;

/// Exit status for an error chain: the code of the first ledger or accrual
/// error found in it, otherwise [`GENERIC_FAILURE`].
pub fn exit_status(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<AccrualError>() {
                Some(e.exit_code())
            } else {
                cause.downcast_ref::<LedgerError>().map(LedgerError::exit_code)
            }
        })
        .unwrap_or(GENERIC_FAILURE)
}
