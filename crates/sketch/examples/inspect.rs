//! Simple inspector for sketch files.

use std::collections::BTreeMap;
use std::fs;

use sketch::{Command, EventLog, Opcode, Player, Reader, Tool};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "image.sk".to_string());

    println!("Reading: {}", path);

    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let mut move_x_count = 0;
    let mut move_y_count = 0;
    let mut data_count = 0;
    let mut tools: BTreeMap<String, usize> = BTreeMap::new();
    for command in Reader::new(&data) {
        match command {
            Command::MoveX(_) => move_x_count += 1,
            Command::MoveY(_) => move_y_count += 1,
            Command::Data(_) => data_count += 1,
            Command::Tool(tool) => *tools.entry(tool.to_string()).or_default() += 1,
        }
    }

    println!("\n=== Commands ({}) ===", data.len());
    println!("  {}: {}", Opcode::MoveX.mnemonic(), move_x_count);
    println!("  {}: {}", Opcode::MoveY.mnemonic(), move_y_count);
    println!("  {}: {}", Opcode::Data.mnemonic(), data_count);
    for (tool, count) in &tools {
        println!("  TOOL {}: {}", tool, count);
    }

    println!("\n=== First 20 Commands (detail) ===");
    let mut reader = Reader::new(&data);
    for _ in 0..20 {
        let offset = reader.position();
        let Some(command) = reader.read_command() else {
            break;
        };
        println!("[{:>6}] {:#04x}  {}", offset, data[offset], command);
    }

    // One pass over every frame, stopping when playback wraps
    let frame_markers = tools
        .get(&Tool::NextFrame.to_string())
        .copied()
        .unwrap_or(0);
    println!("\n=== Frames ({}) ===", frame_markers + 1);
    let mut player = Player::new(data);
    let mut log = EventLog::new();
    for frame in 0..=frame_markers {
        let outcome = player.play_frame(&mut log);
        println!(
            "  frame {}: offset {}, {} commands, {} draws",
            frame,
            outcome.start_offset,
            outcome.commands,
            log.draw_count()
        );
        log.drain();
        if outcome.end_of_stream {
            break;
        }
    }
}
