mod send_sms;

pub use send_sms::{send_sms, SmsSent, MAX_SMS_LENGTH};
