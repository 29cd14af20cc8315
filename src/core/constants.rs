// Protocol constants for the Siglent SDS1000X-E family

// Definite-length block header: "#9" followed by a 9-digit byte count
pub const BLOCK_MARKER: &[u8; 2] = b"#9";
pub const BLOCK_LENGTH_DIGITS: usize = 9;

// Vertical span of one graticule division in DAT2 code units
pub const CODES_PER_DIVISION: f64 = 25.0;

// Unit suffixes seen in SCPI responses. Both cases occur across firmware revisions.
pub const UNIT_SUFFIXES: &[&str] = &["Sa/s", "sa/s", "pts", "Pts", "Hz", "hz", "V", "v", "s", "S"];

pub const SI_PREFIXES: &[(char, f64)] = &[
    ('G', 1e9),
    ('M', 1e6),
    ('k', 1e3),
    ('m', 1e-3),
    ('u', 1e-6),
    ('n', 1e-9),
    ('p', 1e-12),
];

// Analog channels C1..C4
pub const MIN_CHANNEL: u8 = 1;
pub const MAX_CHANNEL: u8 = 4;

// Commands
pub const CMD_STOP: &str = "STOP";
pub const CMD_TDIV: &str = "TDIV?";
pub const CMD_SARA: &str = "SARA?";
// Every point, all points, from the first point
pub const CMD_WAVEFORM_SETUP: &str = "WFSU SP,1,NP,0,FP,0";

// Settle delays (milliseconds)
pub const STOP_SETTLE_MS: u64 = 500;
pub const SETUP_SETTLE_MS: u64 = 100;
pub const REQUEST_SETTLE_MS: u64 = 300;
