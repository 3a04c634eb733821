//! Scripted editing session.
//!
//! Drives the editor through a short diagram-building session and writes
//! the resulting document and a print of it to an output directory
//! (first argument, `gridwire-session-out` by default).

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use kurbo::Point;

use gridwire_core::{DrawMode, Editor, Mode};
use gridwire_engine::{pump, render_region, save_png, PrintRegion, SceneGraph};

fn main() {
    env_logger::init();
    log::info!("Starting GridWire session");

    if let Err(err) = run() {
        log::error!("session failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let out_dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "gridwire-session-out".to_string()),
    );
    fs::create_dir_all(&out_dir)?;

    let mut scene = SceneGraph::new();
    let mut editor = Editor::new();

    // Two snapped dots.
    editor.set_mode(&mut scene, Mode::Draw);
    click(&mut editor, &mut scene, Point::new(42.0, 17.0));
    click(&mut editor, &mut scene, Point::new(104.0, 98.0));

    // A wire between them.
    editor.set_draw_mode(&mut scene, DrawMode::Line);
    scene.pointer_down(Point::new(31.0, 29.0));
    pump(&mut editor, &mut scene);
    scene.pointer_up(Point::new(103.0, 92.0));
    pump(&mut editor, &mut scene);

    // A freehand annotation.
    editor.set_draw_mode(&mut scene, DrawMode::Freehand);
    scene.pointer_down(Point::new(150.0, 40.0));
    for step in 1..=20 {
        let t = f64::from(step) * 4.0;
        scene.pointer_move(Point::new(150.0 + t, 40.0 + (t / 8.0).sin() * 10.0));
    }
    scene.pointer_up(Point::new(230.0, 40.0));
    pump(&mut editor, &mut scene);

    // Nudge the first dot.
    editor.set_mode(&mut scene, Mode::Select);
    scene.pointer_down(Point::new(30.0, 30.0));
    pump(&mut editor, &mut scene);
    scene.pointer_move(Point::new(60.0, 60.0));
    pump(&mut editor, &mut scene);
    scene.pointer_up(Point::new(60.0, 60.0));
    pump(&mut editor, &mut scene);

    // Duplicate it and drag the copy clear of its source.
    editor.copy(&scene);
    editor.paste(&mut scene);
    pump(&mut editor, &mut scene);
    scene.pointer_down(Point::new(60.0, 60.0));
    pump(&mut editor, &mut scene);
    scene.pointer_move(Point::new(150.0, 90.0));
    pump(&mut editor, &mut scene);
    scene.pointer_up(Point::new(150.0, 90.0));
    pump(&mut editor, &mut scene);

    // Select the wire and quarter-turn it about its center.
    click(&mut editor, &mut scene, Point::new(60.0, 60.0));
    editor.rotate_selection(&mut scene);
    pump(&mut editor, &mut scene);

    // Exercise the history both ways.
    editor.undo(&mut scene);
    editor.redo(&mut scene);
    pump(&mut editor, &mut scene);

    log::info!(
        "session produced {} shapes, {} undoable steps",
        scene.len(),
        editor.history().undo_len()
    );

    let json_path = out_dir.join("diagram.json");
    editor.save_document(&scene, &json_path)?;
    log::info!("document written to {}", json_path.display());

    let image = render_region(&scene, &PrintRegion::around(&scene));
    let png_path = out_dir.join("diagram.png");
    save_png(&image, &png_path)?;
    log::info!(
        "print written to {} ({}x{})",
        png_path.display(),
        image.width,
        image.height
    );

    Ok(())
}

/// One press-release pair, pumped after each input like a real host.
fn click(editor: &mut Editor, scene: &mut SceneGraph, at: Point) {
    scene.pointer_down(at);
    pump(editor, scene);
    scene.pointer_up(at);
    pump(editor, scene);
}
