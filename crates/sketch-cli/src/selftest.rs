//! Test command - check `generate_commands` against the composed generators

use anyhow::{Result, bail};

use sketch::command::chunks_for;
use sketch::{colour_and_position_commands, colour_commands, generate_commands, position_commands};

/// Pixel flags and the commands they are expected to produce.
struct Case {
    grey: u8,
    row: u32,
    col: u32,
    matches_left: bool,
    matches_right: bool,
}

const fn case(grey: u8, row: u32, col: u32, matches_left: bool, matches_right: bool) -> Case {
    Case {
        grey,
        row,
        col,
        matches_left,
        matches_right,
    }
}

const CASES: &[Case] = &[
    case(0, 0, 56, false, false),
    case(0, 128, 4, false, false),
    case(0, 90, 128, false, false),
    case(0, 128, 200, false, false),
    case(100, 0, 0, false, true),
    case(255, 0, 0, false, true),
    case(128, 0, 0, true, false),
    case(128, 0, 199, true, false),
    case(128, 199, 0, true, false),
    case(128, 199, 199, true, false),
    case(69, 0, 0, true, true),
    case(69, 0, 134, true, true),
    case(69, 134, 0, true, true),
    case(69, 134, 134, true, true),
];

const COLOUR_LEN: usize = 7;

fn position_len(row: u32, col: u32) -> usize {
    chunks_for(row) + chunks_for(col) + 3
}

fn check(case: &Case) -> Result<()> {
    let actual = generate_commands(
        case.grey,
        case.row,
        case.col,
        case.matches_left,
        case.matches_right,
    )?;

    let (expected, expected_len) = match (case.matches_left, case.matches_right) {
        (false, true) => (colour_commands(case.grey), COLOUR_LEN),
        (true, false) => (
            position_commands(case.row, case.col)?,
            position_len(case.row, case.col),
        ),
        _ => (
            colour_and_position_commands(case.grey, case.row, case.col)?,
            COLOUR_LEN + position_len(case.row, case.col),
        ),
    };

    if actual != expected || actual.len() != expected_len {
        bail!(
            "The test for grey {} at ({}, {}) fails: got {:02x?}, expected {:02x?}",
            case.grey,
            case.row,
            case.col,
            actual,
            expected
        );
    }
    Ok(())
}

/// Execute the test command
pub fn execute() -> Result<()> {
    for case in CASES {
        check(case)?;
    }
    println!("All tests pass.");
    Ok(())
}
