//! Render methods for each wizard step

mod disclaimer;
mod instructions;
mod result;
mod upload;
