//! Black-box tests for the Waymark engine live under `tests/`.
