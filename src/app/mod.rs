pub mod ports;
pub mod track_use_case;
