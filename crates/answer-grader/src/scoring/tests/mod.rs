mod common;
mod guardrails;
mod properties;
mod safety;
