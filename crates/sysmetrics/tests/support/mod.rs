//! Shared helpers for the delivery and pipeline tests: a scripted HTTP
//! endpoint and synthetic OS roots with stubbed probe commands.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use sysmetrics::{env_from_map, Collector, EnvLookup, Probe, ProbeSet};

/// One recorded POST.
#[derive(Debug, Clone)]
pub struct Hit {
    pub path: String,
    pub body: String,
}

struct ServerState {
    statuses: Vec<u16>,
    hits: Vec<Hit>,
}

/// Minimal scripted HTTP endpoint. Each request is answered with the next
/// status in the script (the last one repeats) and recorded with its path
/// and body.
pub struct TestServer {
    addr: std::net::SocketAddr,
    state: Arc<Mutex<ServerState>>,
}

impl TestServer {
    pub fn start(statuses: &[u16]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(ServerState {
            statuses: statuses.to_vec(),
            hits: Vec::new(),
        }));

        let server_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let Some((path, body)) = read_request(&mut stream) else {
                    continue;
                };
                let status = {
                    let mut state = server_state.lock().unwrap();
                    let index = state.hits.len().min(state.statuses.len() - 1);
                    let status = state.statuses[index];
                    state.hits.push(Hit { path, body });
                    status
                };
                let reason = if status < 400 { "OK" } else { "Error" };
                let _ = stream.write_all(
                    format!(
                        "HTTP/1.1 {status} {reason}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.lock().unwrap().hits.clone()
    }
}

fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        match stream.read(&mut byte) {
            Ok(0) => return None,
            Ok(_) => head.push(byte[0]),
            Err(_) => return None,
        }
    }
    let head = String::from_utf8_lossy(&head).into_owned();
    let path = head
        .lines()
        .next()?
        .split_whitespace()
        .nth(1)?
        .to_string();
    let length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = vec![0u8; length];
    stream.read_exact(&mut body).ok()?;
    Some((path, String::from_utf8_lossy(&body).into_owned()))
}

pub const LSPCI_FIXTURE: &str = "00:02.0 0300: 8086:0126 (rev 09)\n";

pub const LSCPU_FIXTURE: &str = r#"{"lscpu": [
  {"field": "Vendor ID:", "data": "GenuineIntel"},
  {"field": "Model name:", "data": "Intel(R) Core(TM) i7-7700 CPU @ 3.60GHz"},
  {"field": "CPU family:", "data": "6"},
  {"field": "Model:", "data": "158"},
  {"field": "Stepping:", "data": "9"}
]}
"#;

pub const XRANDR_FIXTURE: &str = "\
eDP-1 connected primary 1920x1080+0+0 344mm x 194mm
   1920x1080     59.93*+  54.97
";

pub const DF_FIXTURE: &str = "\
Filesystem     1K-blocks      Used Available Use% Mounted on
/dev/sda3      479079112 143550492 311118136  32% /
";

pub const LDSO_FIXTURE: &str = "\
Subdirectories of glibc-hwcaps directories, in priority order:
  x86-64-v3 (supported, searched)
  x86-64-v2 (supported, searched)
";

/// A root with os-release (ubuntu 18.04), timezone, gdm3 and DMI fixtures.
pub fn fixture_root() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    let path = root.path();
    fs::create_dir_all(path.join("etc/gdm3")).unwrap();
    fs::create_dir_all(path.join("sys/class/dmi/id")).unwrap();
    fs::write(
        path.join("etc/os-release"),
        "NAME=\"Ubuntu\"\nID=ubuntu\nVERSION_ID=\"18.04\"\n",
    )
    .unwrap();
    fs::write(path.join("etc/timezone"), "Europe/Paris\n").unwrap();
    fs::write(
        path.join("etc/gdm3/custom.conf"),
        "[daemon]\nAutomaticLoginEnable = false\n",
    )
    .unwrap();
    fs::write(path.join("sys/class/dmi/id/sys_vendor"), "DID Inc.\n").unwrap();
    fs::write(path.join("sys/class/dmi/id/product_name"), "ABC\n").unwrap();
    fs::write(path.join("sys/class/dmi/id/product_family"), "laptop\n").unwrap();
    fs::write(path.join("sys/class/dmi/id/bios_vendor"), "DID Inc.\n").unwrap();
    fs::write(path.join("sys/class/dmi/id/bios_version"), "42.0\n").unwrap();
    root
}

/// Probes that `cat` fixed fixture files instead of inspecting the host.
pub fn stub_probes(dir: &Path) -> ProbeSet {
    let write = |name: &str, content: &str| -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    };
    let cat = |name: &'static str, path: PathBuf| -> Probe {
        Probe::new(name, "cat", &[path.to_str().unwrap()])
    };
    ProbeSet {
        gpu: cat("gpu", write("lspci.txt", LSPCI_FIXTURE)),
        cpu: cat("cpu", write("lscpu.json", LSCPU_FIXTURE)),
        screens: cat("screens", write("xrandr.txt", XRANDR_FIXTURE)),
        partitions: cat("partitions", write("df.txt", DF_FIXTURE)),
        architecture: cat("architecture", write("arch.txt", "amd64\n")),
        libc6: cat("libc6", write("libc6.txt", "Version: 2.27-3ubuntu1\n")),
        hwcap: cat("hwcap", write("ldso.txt", LDSO_FIXTURE)),
    }
}

/// Probes whose commands all fail, yielding an all-empty hardware section.
pub fn failing_probes() -> ProbeSet {
    let fail = |name: &'static str| Probe::new(name, "false", &[]);
    ProbeSet {
        gpu: fail("gpu"),
        cpu: fail("cpu"),
        screens: fail("screens"),
        partitions: fail("partitions"),
        architecture: fail("architecture"),
        libc6: fail("libc6"),
        hwcap: fail("hwcap"),
    }
}

/// The environment every pipeline test runs with.
pub fn test_env(cache_root: &Path) -> EnvLookup {
    env_from_map(HashMap::from([
        (
            "XDG_CACHE_HOME".to_string(),
            cache_root.to_str().unwrap().to_string(),
        ),
        ("XDG_CURRENT_DESKTOP".to_string(), "some:thing".to_string()),
        ("XDG_SESSION_DESKTOP".to_string(), "ubuntusession".to_string()),
        ("XDG_SESSION_TYPE".to_string(), "x11".to_string()),
        ("LANG".to_string(), "fr_FR.UTF-8".to_string()),
        ("LANGUAGE".to_string(), "fr_FR.UTF-8".to_string()),
    ]))
}

/// Collector wired to a fixture root, stub probes and a private cache.
pub fn test_collector(root: &Path, probe_dir: &Path, cache_root: &Path) -> Collector {
    Collector::new()
        .with_root(root)
        .with_env(test_env(cache_root))
        .with_probes(stub_probes(probe_dir))
}
