use coinflip_core::{
    Face, PlayLabel, Presenter, QueuedDriver, ScoreText, SeededFaceSource, SpinController,
};

struct Printer;

impl Presenter for Printer {
    fn set_coin_face(&mut self, face: Face) {
        println!("coin shows {face}");
    }
    fn set_choice_enabled(&mut self, heads_enabled: bool, tails_enabled: bool) {
        println!("heads button enabled={heads_enabled} tails button enabled={tails_enabled}");
    }
    fn set_play_button_label(&mut self, label: PlayLabel) {
        println!("play button reads {label:?}");
    }
    fn set_score_text(&mut self, score: ScoreText) {
        println!("score {score:?}");
    }
    fn set_latest_flip_text(&mut self, face: Face) {
        println!("latest flip {face}");
    }
}

fn main() {
    // Example end-to-end flip: two spin cycles, then stop and settle
    let source = SeededFaceSource::new("example-server-seed", "example-client-seed", 1);
    println!("server_seed_hash={}", source.server_seed_hash_hex());
    let mut game = SpinController::new(Printer, QueuedDriver::new(), source);
    game.refresh();
    game.toggle_choice();
    game.toggle_play();
    for _ in 0..4 {
        game.driver_mut().take();
        game.on_phase_complete();
    }
    game.toggle_play();
    let result = loop {
        game.driver_mut().take();
        if let Some(face) = game.on_phase_complete() {
            break face;
        }
    };
    println!("settled={result} state={:?}", game.state());
}
