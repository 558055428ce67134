mod money;
mod secret;

pub use money::{MoneyConversionError, Paise, Rupees, INR_CURRENCY_CODE, INR_MINOR_UNITS_PER_RUPEE};
pub use secret::Secret;
