/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a startup `Result`, logging the failure with some context and exiting the process.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr, $context:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("{}: {}", $context, e);
                std::process::exit(1);
            }
        }
    };
}
