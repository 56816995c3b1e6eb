//! Input helpers for passwords, seed phrases and envelope text.

mod input;

pub use input::{
    prompt_new_password, prompt_password, read_envelope, read_seed, write_private_file,
};
