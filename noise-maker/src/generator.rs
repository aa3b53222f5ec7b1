use chrono::{DateTime, Local};
use rand::{Rng, seq::IndexedRandom};

const MALFORMED_RATIO: f64 = 0.02;

const SERVERS: [(&str, u8); 2] = [("web1", 3), ("web2", 1)];
const METHODS: [(&str, u8); 4] = [("GET", 12), ("POST", 2), ("HEAD", 1), ("PUT", 1)];
const PATHS: [(&str, u8); 9] = [
    ("/", 20),
    ("/blog/", 15),
    ("/post/hello-world", 20),
    ("/about", 5),
    ("/feed.xml", 5),
    ("/wp-login.php", 6),
    ("/wp-content/plugins/", 3),
    ("/xmlrpc.php", 3),
    ("/favicon.ico", 8),
];
const STATUS: [(u16, u8); 7] = [
    (200, 60),
    (206, 2),
    (301, 5),
    (304, 10),
    (404, 15),
    (403, 3),
    (500, 2),
];
const REFERERS: [(&str, u8); 3] = [
    ("-", 10),
    ("https://example.org/", 3),
    ("https://duckduckgo.com/", 1),
];
const AGENTS: [(&str, u8); 10] = [
    (
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0",
        30,
    ),
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
        30,
    ),
    (
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
        10,
    ),
    (
        "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)",
        5,
    ),
    (
        "Mozilla/5.0 (compatible; SemrushBot/7~bl; +http://www.semrush.com/bot.html)",
        3,
    ),
    ("Go-http-client/1.1", 5),
    ("WordPress/6.5; https://example.net", 2),
    ("Apache/2.4.62 (Debian) (internal dummy connection)", 2),
    ("curl/8.5.0", 3),
    (r#"Mozilla/5.0 "Quoted" Agent"#, 1),
];

pub fn generate_line<R: Rng + ?Sized>(rng: &mut R, moment: DateTime<Local>) -> String {
    if rng.random_bool(MALFORMED_RATIO) {
        generate_malformed_log(rng, moment)
    } else {
        generate_access_log(rng, moment)
    }
}

fn client_ip<R: Rng + ?Sized>(rng: &mut R) -> String {
    if rng.random_bool(0.1) {
        format!("2001:db8::{:x}", rng.random_range(1..0xffffu32))
    } else {
        format!(
            "198.51.{}.{}",
            rng.random_range(0..256),
            rng.random_range(1..255)
        )
    }
}

pub fn generate_access_log<R: Rng + ?Sized>(rng: &mut R, moment: DateTime<Local>) -> String {
    render(rng, moment, true)
}

/// A line with the request quotes stripped, which no parser should accept.
pub fn generate_malformed_log<R: Rng + ?Sized>(rng: &mut R, moment: DateTime<Local>) -> String {
    render(rng, moment, false)
}

fn render<R: Rng + ?Sized>(rng: &mut R, moment: DateTime<Local>, quote_request: bool) -> String {
    let server = SERVERS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let ip = client_ip(rng);
    let timestamp = moment.format("%d/%b/%Y:%H:%M:%S %z");
    let seconds = rng.random_range(0..3);
    let method = METHODS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let path = PATHS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let status = STATUS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let size = if status == 304 {
        "-".to_string()
    } else {
        rng.random_range(100..20_000).to_string()
    };
    let referer = REFERERS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let agent = AGENTS.choose_weighted(rng, |(_, w)| *w).unwrap().0;
    let q = if quote_request { "\"" } else { "" };

    format!(
        "{server} {ip} - - [{timestamp}] ({seconds} s) {q}{method} {path} HTTP/1.1{q} {status} {size} \"{referer}\" \"{agent}\""
    )
}
