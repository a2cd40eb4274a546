//! Shared test fixtures for the scorecard SDK integration tests.
//!
//! Provides deterministic client records, CSV writers for source and sampled
//! tables, and `StubScorer`: a one-shot local HTTP responder that stands in
//! for the scoring endpoint and captures the request body it received.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::thread::{self, JoinHandle};

use scorecard_sdk::ClientRecord;

// ---------------------------------------------------------------------------
// Deterministic records
// ---------------------------------------------------------------------------

/// A valid client record with values derived arithmetic-only from `id`, so
/// fixtures are reproducible and assertable without tables of constants.
pub fn sample_record(id: i64) -> ClientRecord {
    let i = id as f64;
    ClientRecord {
        id,
        income_total: 120_000.0 + (i * 1_500.0) % 150_000.0,
        credit_amount: 250_000.0 + (i * 7_000.0) % 500_000.0,
        annuity_amount: 12_000.0 + (i * 350.0) % 30_000.0,
        family_members: 1.0 + (id % 5) as f64,
        days_birth: -(9_000.0 + (i * 37.0) % 14_000.0),
        days_employed: -(200.0 + (i * 53.0) % 8_000.0),
        days_registration: -(1_000.0 + (i * 91.0) % 6_000.0),
        days_id_publish: -(300.0 + (i * 17.0) % 5_000.0),
    }
}

/// Write records as a sampled client table (the format the sampler emits).
pub fn write_clients_csv(path: &Path, records: &[ClientRecord]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    for record in records {
        writer.serialize(record).unwrap();
    }
    writer.flush().unwrap();
}

/// Header of a source export: the required columns buried among others, in
/// an order the sampler must not rely on.
pub const SOURCE_HEADER: &str = "TARGET,SK_ID_CURR,NAME_CONTRACT_TYPE,AMT_INCOME_TOTAL,AMT_CREDIT,AMT_ANNUITY,CNT_FAM_MEMBERS,DAYS_BIRTH,DAYS_EMPLOYED,DAYS_REGISTRATION,DAYS_ID_PUBLISH";

/// One complete source row for `id`, matching [`sample_record`].
pub fn source_row(id: i64) -> String {
    let r = sample_record(id);
    format!(
        "0,{},Cash loans,{},{},{},{},{},{},{},{}",
        r.id,
        r.income_total,
        r.credit_amount,
        r.annuity_amount,
        r.family_members,
        r.days_birth,
        r.days_employed,
        r.days_registration,
        r.days_id_publish
    )
}

/// Write a source export with `valid_rows` complete rows (ids starting at
/// 100001).
pub fn write_source_csv(path: &Path, valid_rows: usize) {
    let mut content = String::from(SOURCE_HEADER);
    content.push('\n');
    for i in 0..valid_rows {
        content.push_str(&source_row(100_001 + i as i64));
        content.push('\n');
    }
    std::fs::write(path, content).unwrap();
}

// ---------------------------------------------------------------------------
// StubScorer
// ---------------------------------------------------------------------------

/// A local one-shot scoring endpoint: accepts exactly one HTTP request,
/// answers with a canned status and body, and hands back the request body it
/// saw. Keep one stub per request; the connection closes after the exchange.
pub struct StubScorer {
    addr: SocketAddr,
    handle: JoinHandle<Option<String>>,
}

impl StubScorer {
    /// Serve one request with the given status code and JSON body.
    pub fn respond_with(status: u16, body: &str) -> StubScorer {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().ok()?;
            let request_body = read_request_body(&mut stream)?;
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason(status),
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).ok()?;
            stream.flush().ok()?;
            Some(request_body)
        });
        StubScorer { addr, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}/predict", self.addr)
    }

    /// Wait for the exchange to finish and return the captured request body.
    pub fn into_request_body(self) -> Option<String> {
        self.handle.join().unwrap()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

/// Read one HTTP request off the stream and return its body.
fn read_request_body(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_blank_line(&buf) {
            break pos;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    buf.get(body_start..body_start + content_length)
        .map(|body| String::from_utf8_lossy(body).to_string())
}

fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
