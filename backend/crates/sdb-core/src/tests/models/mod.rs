mod auth_level;
mod thing;
mod trust_context;
