//! End-to-end tests: grey-map in, drawing calls out.

use sketch::command::grey_colour;
use sketch::{
    Canvas, Command, DrawEvent, EncodeOptions, EventLog, Greymap, Pen, Player, Tool,
    encode_data_chunks, encode_grid, encode_grid_with_options, parse_pgm, play_frame,
};

/// The value the accumulator holds when `TOOL COLOUR` fires after the
/// encoder's colour sequence for `grey`.
fn decoded_colour(grey: u8) -> u32 {
    ((u64::from(grey_colour(grey)) << 12) | (63 << 6) | 3) as u32
}

fn events_for(stream: &[u8]) -> Vec<DrawEvent> {
    let mut pen = Pen::new();
    let mut log = EventLog::new();
    play_frame(stream, &mut pen, &mut log);
    log.events
}

#[test]
fn test_two_by_two_scenario() {
    let grid = [[10u8, 10], [10, 200]];
    let stream = encode_grid(&grid).unwrap();

    assert_eq!(
        events_for(&stream),
        vec![
            // row 0 is one run: a single colour and a single draw
            DrawEvent::Colour(decoded_colour(10)),
            DrawEvent::Line { x0: 0, y0: 0, x1: 1, y1: 0 },
            // row 1 switches from 10 to 200 at the column boundary
            DrawEvent::Colour(decoded_colour(10)),
            DrawEvent::Line { x0: 1, y0: 0, x1: 0, y1: 1 },
            DrawEvent::Colour(decoded_colour(200)),
            DrawEvent::Line { x0: 0, y0: 1, x1: 1, y1: 1 },
            DrawEvent::Present,
        ]
    );
}

#[test]
fn test_legacy_comparison_on_same_scenario() {
    let grid = [[10u8, 10], [10, 200]];
    let stream = encode_grid_with_options(&grid, EncodeOptions::legacy()).unwrap();

    // equal samples never count as a left match, so (0,1) repeats the
    // colour; (1,1) differs from its left and only gets a position, which
    // draws it in the colour of the run before it
    assert_eq!(
        events_for(&stream),
        vec![
            DrawEvent::Colour(decoded_colour(10)),
            DrawEvent::Colour(decoded_colour(10)),
            DrawEvent::Line { x0: 0, y0: 0, x1: 1, y1: 0 },
            DrawEvent::Colour(decoded_colour(10)),
            DrawEvent::Line { x0: 1, y0: 0, x1: 0, y1: 1 },
            DrawEvent::Line { x0: 0, y0: 1, x1: 1, y1: 1 },
            DrawEvent::Present,
        ]
    );
}

#[test]
fn test_every_run_ends_on_its_last_pixel() {
    let map = Greymap::from_rows(&[[3u8, 3, 3, 9, 9, 1], [4, 4, 4, 4, 4, 4]]).unwrap();
    let stream = encode_grid(&map).unwrap();

    let ends: Vec<(i32, i32)> = events_for(&stream)
        .into_iter()
        .filter_map(|event| match event {
            DrawEvent::Line { x1, y1, .. } => Some((x1, y1)),
            _ => None,
        })
        .collect();
    assert_eq!(ends, vec![(2, 0), (4, 0), (5, 0), (5, 1)]);
}

#[test]
fn test_pgm_to_canvas() {
    let mut data = b"P5\n3 1\n255\n".to_vec();
    data.extend_from_slice(&[0, 0, 255]);
    let map = parse_pgm(&data).unwrap();
    let stream = encode_grid(&map).unwrap();

    let mut canvas = Canvas::new(3, 1);
    let mut pen = Pen::new();
    let outcome = play_frame(&stream, &mut pen, &mut canvas);

    assert!(outcome.end_of_stream);
    assert_eq!(canvas.present_count(), 1);
    let [r, g, b, _] = decoded_colour(255).to_be_bytes();
    assert_eq!(canvas.pixel(2, 0), Some([r, g, b]));
    let [r, g, b, _] = decoded_colour(0).to_be_bytes();
    assert_eq!(canvas.pixel(0, 0), Some([r, g, b]));
}

#[test]
fn test_frames_split_an_encoded_stream() {
    let first = encode_grid(&[[7u8, 7]]).unwrap();
    let second = encode_grid(&[[1u8, 2]]).unwrap();
    let mut stream = first.clone();
    stream.push(Command::Tool(Tool::NextFrame).encode());
    stream.extend_from_slice(&second);

    let mut player = Player::new(stream);
    let mut log = EventLog::new();

    let outcome = player.play_frame(&mut log);
    assert_eq!(outcome.resume_offset, first.len() + 1);
    assert_eq!(log.drain(), events_for(&first));

    let outcome = player.play_frame(&mut log);
    assert!(outcome.end_of_stream);
    assert_eq!(outcome.resume_offset, 0);
    assert_eq!(log.drain(), events_for(&second));

    // wrapped: the first frame again
    player.play_frame(&mut log);
    assert_eq!(log.drain(), events_for(&first));
}

#[test]
fn test_far_target_stream_renders_promptly() {
    let mut stream = encode_data_chunks(0x7FFF_FFFF, 6).unwrap();
    stream.push(Command::Tool(Tool::TargetX).encode());
    stream.push(Command::MoveY(0).encode());
    assert_eq!(stream.len(), 8);

    let mut canvas = Canvas::new(200, 200);
    let mut pen = Pen::new();
    play_frame(&stream, &mut pen, &mut canvas);

    assert_eq!(canvas.pixel(199, 0), Some([255, 255, 255]));
    assert_eq!(canvas.pixel(0, 1), Some([0, 0, 0]));
}

#[test]
fn test_converted_grey_renders_shifted() {
    let stream = encode_grid(&[[128u8]]).unwrap();
    let mut canvas = Canvas::new(1, 1);
    let mut pen = Pen::new();
    play_frame(&stream, &mut pen, &mut canvas);
    assert_eq!(canvas.pixel(0, 0), Some([8, 8, 15]));
}
