use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// `user:pass` in basic-auth form.
const EXPECTED_AUTH: &str = "authorization: basic dxnlcjpwyxnz";

pub const GPS_EVENTS: &str = "\
event_id,individual_local_identifier,timestamp,location_lat,location_long,ground_speed
1,Zebra-1,2024-06-01 06:00:00.000,-1.3000,36.8000,1.5
2,Zebra-1,2024-06-01 12:00:00.000,-1.3100,36.8200,
3,Zebra-1,2024-06-02 06:00:00.000,-1.3300,36.8500,3.0
";

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a fake direct-read service for tests.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_direct_read_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}/direct-read", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    if stream.set_nonblocking(false).is_err() {
        return None;
    }
    let mut request = Vec::new();
    let mut buffer = [0u8; 1024];
    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            break;
        }
        request.extend_from_slice(buffer.get(..read)?);
    }
    Some(String::from_utf8_lossy(&request).to_lowercase())
}

fn route(request: &str) -> (&'static str, &'static str) {
    let target = request.lines().next().unwrap_or("");
    if !request.contains(EXPECTED_AUTH) {
        return ("403 Forbidden", "");
    }
    if target.contains("entity_type=study&") || target.contains("entity_type=study ") {
        return ("200 OK", "id,name\n42,Serengeti Zebras\n");
    }
    if target.contains("entity_type=individual") {
        return (
            "200 OK",
            "id,local_identifier,taxon_canonical_name\n1,Zebra-1,Equus quagga\n",
        );
    }
    if target.contains("entity_type=tag") {
        return ("200 OK", "id,local_identifier\n10,T1\n");
    }
    if target.contains("entity_type=deployment") {
        return ("403 Forbidden", "");
    }
    if target.contains("entity_type=sensor") {
        return ("200 OK", "tag_id,sensor_type_id\n10,653\n10,2365683\n");
    }
    if target.contains("entity_type=event") && target.contains("sensor_type_id=653") {
        return ("200 OK", GPS_EVENTS);
    }
    if target.contains("entity_type=event") {
        return ("200 OK", "");
    }
    ("500 Internal Server Error", "unknown entity")
}

fn handle_client(mut stream: TcpStream) {
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let (status, body) = route(&request);
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Run the `movetrack` binary in `cwd` and capture output.
///
/// Credentials come only from `env`, so the caller's `mbus`/`mbpw` never leak in.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_movetrack<I, S>(cwd: &Path, args: I, env: &[(&str, &str)]) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = movetrack_bin()?;
    let mut command = Command::new(bin);
    command
        .current_dir(cwd)
        .args(args)
        .env_remove("mbus")
        .env_remove("mbpw")
        .env_remove("MOVETRACK_LOG")
        .env("RUST_LOG", "error");
    for (key, value) in env {
        command.env(key, value);
    }
    command
        .output()
        .map_err(|err| format!("run movetrack failed: {}", err))
}

fn movetrack_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_movetrack").map_or_else(
        || Err("CARGO_BIN_EXE_movetrack missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}

pub fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
