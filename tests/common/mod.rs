#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A transport whose reads are scripted one `read` call at a time.
/// Once the script runs out every read returns `Ok(0)`
pub struct ScriptedStream {
    script: VecDeque<io::Result<Vec<u8>>>,
    pub reads: usize,
    pub written: Vec<u8>,
}

impl ScriptedStream {
    pub fn new(script: Vec<io::Result<Vec<u8>>>) -> Self {
        ScriptedStream {
            script: script.into(),
            reads: 0,
            written: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        match self.script.pop_front() {
            None => Ok(0),
            Some(Err(e)) => Err(e),
            Some(Ok(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    self.script.push_front(Ok(data.split_off(n)));
                }
                Ok(n)
            }
        }
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// An in-memory memcached that answers each command line from a fixed table.
/// Unknown commands are answered with `ERROR`, an empty reply string sends nothing back
#[derive(Default)]
pub struct FakeMemcached {
    replies: HashMap<String, String>,
    inbox: Vec<u8>,
    pending: VecDeque<u8>,
    pub commands: Vec<String>,
    pub reads: usize,
}

impl FakeMemcached {
    pub fn new() -> Self {
        FakeMemcached::default()
    }

    pub fn reply(mut self, command: &str, reply: &str) -> Self {
        self.replies.insert(command.to_string(), reply.to_string());
        self
    }

    /// the `delete` commands that were sent, in order
    pub fn deletes(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|c| c.starts_with("delete "))
            .map(String::as_str)
            .collect()
    }
}

impl Read for FakeMemcached {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        let n = self.pending.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for FakeMemcached {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inbox.extend_from_slice(buf);
        while let Some(end) = self.inbox.windows(2).position(|w| w == b"\r\n") {
            let line: Vec<u8> = self.inbox.drain(..end + 2).collect();
            let line = String::from_utf8_lossy(&line[..end]).into_owned();
            let reply = self
                .replies
                .get(&line)
                .cloned()
                .unwrap_or_else(|| "ERROR\r\n".to_string());
            self.pending.extend(reply.bytes());
            self.commands.push(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// builds a `stats items` reply naming the given slab classes
pub fn directory(classes: &[u32]) -> String {
    let mut reply = String::new();
    for id in classes {
        reply.push_str(&format!("STAT items:{}:number 1\r\n", id));
        reply.push_str(&format!("STAT items:{}:age 42\r\n", id));
    }
    reply.push_str("END\r\n");
    reply
}

/// builds a `stats cachedump` reply listing the given keys
pub fn dump(keys: &[&str]) -> String {
    let mut reply = String::new();
    for key in keys {
        reply.push_str(&format!("ITEM {} [5 b; 0 s]\r\n", key));
    }
    reply.push_str("END\r\n");
    reply
}

/// Spawns a memcached stand-in on a random local port and returns its address together
/// with the log of command lines it received.
pub fn spawn_server(replies: Vec<(&str, &str)>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();
    let replies: HashMap<String, String> = replies
        .into_iter()
        .map(|(c, r)| (c.to_string(), r.to_string()))
        .collect();
    let log = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
        serve(stream, &replies, &server_log);
    });

    (addr, log)
}

fn serve(stream: TcpStream, replies: &HashMap<String, String>, log: &Mutex<Vec<String>>) {
    let mut writer = stream.try_clone().expect("clone");
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let command = line.trim_end_matches(&['\r', '\n'][..]).to_string();
        let reply = replies
            .get(&command)
            .cloned()
            .unwrap_or_else(|| "ERROR\r\n".to_string());
        log.lock().expect("log").push(command);
        if writer.write_all(reply.as_bytes()).and_then(|_| writer.flush()).is_err() {
            return;
        }
    }
}
