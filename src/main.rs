use mpchess::engine::{Engine, Options};
use mpchess::uci;

fn main() {
    let engine = Engine::new(Options::default());
    println!("Welcome to {}!", uci::ENGINE_NAME);
    uci::uci_loop(&engine);
}
