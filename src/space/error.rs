use std::{error::Error, fmt};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBusParams {
        addr_width: u32,
        data_width: u32,
    },
    DuplicateField {
        name: String,
    },
    ZeroWidthField {
        name: String,
    },
    FieldTooWide {
        name: String,
        width: u32,
        data_width: u32,
    },
    ValueOverflow {
        name: String,
        value: u64,
        width: u32,
    },
    UnknownField {
        name: String,
    },
    NotFinalized,
    AlreadyFinalized,
    AddressSpaceExhausted {
        bins: usize,
        addr_width: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBusParams {
                addr_width,
                data_width,
            } => write!(
                f,
                "unsupported bus parameters (addr_width {addr_width}, data_width {data_width}); \
                 addr_width must be 1..=32 and data_width 1..=64"
            ),
            ConfigError::DuplicateField { name } => {
                write!(f, "field '{name}' is already declared")
            }
            ConfigError::ZeroWidthField { name } => {
                write!(f, "field '{name}' declared with zero width")
            }
            ConfigError::FieldTooWide {
                name,
                width,
                data_width,
            } => write!(
                f,
                "field '{name}' is {width} bits wide but registers hold at most {data_width}"
            ),
            ConfigError::ValueOverflow { name, value, width } => write!(
                f,
                "value 0x{value:X} does not fit in the {width}-bit field '{name}'"
            ),
            ConfigError::UnknownField { name } => write!(f, "field '{name}' is not declared"),
            ConfigError::NotFinalized => {
                write!(f, "configuration space has not been finalized")
            }
            ConfigError::AlreadyFinalized => {
                write!(f, "configuration space was already finalized")
            }
            ConfigError::AddressSpaceExhausted { bins, addr_width } => write!(
                f,
                "{bins} register bins exceed the {addr_width}-bit address space"
            ),
        }
    }
}

impl Error for ConfigError {}
