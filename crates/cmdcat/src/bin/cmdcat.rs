//! cmdcat - Report the commands registered by installed extensions.

fn main() -> std::process::ExitCode {
    cmdcat::cmd::catalog::main()
}
