mod shared;

/// Writes and removes containerd registry mirror configuration,
///
fn main() -> std::process::ExitCode {
    shared::start()
}
