pub mod comma_separated;
pub mod json_from_string;
