fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    logic_board::run_app()
}
