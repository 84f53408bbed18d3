use log::error;

fn main() {
    routine_lib::logging::init();

    if let Err(e) = routine_lib::run() {
        error!("Routine host failed: {e}");
        std::process::exit(1);
    }
}
