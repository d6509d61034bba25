use raptor::engine::uci;

fn main() {
    uci::main_loop();
}
