// Scripted in-memory UCS Manager endpoint.
//
// Implements `Transport` by routing on the request's root element and
// answering from canned XML, recording every request it sees.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::time::Instant;
use ucs::{Client, Config, Error, PostRequest, Transport};

pub const ENDPOINT: &str = "https://ucs01.example.org/";

type Handler = dyn Fn(&str, &str) -> Result<String, String> + Send + Sync;

/// One request observed by the endpoint.
#[derive(Debug, Clone)]
pub struct Recorded {
	pub method: String,
	pub body: String,
	pub at: Instant,
}

pub struct MockEndpoint {
	handler: Box<Handler>,
	delay: Option<Duration>,
	requests: Mutex<Vec<Recorded>>,
}

impl MockEndpoint {
	pub fn new(handler: impl Fn(&str, &str) -> Result<String, String> + Send + Sync + 'static) -> Arc<Self> {
		Arc::new(Self {
			handler: Box::new(handler),
			delay: None,
			requests: Mutex::new(Vec::new()),
		})
	}

	/// Endpoint that takes `delay` to answer every request.
	pub fn slow(handler: impl Fn(&str, &str) -> Result<String, String> + Send + Sync + 'static, delay: Duration) -> Arc<Self> {
		Arc::new(Self {
			handler: Box::new(handler),
			delay: Some(delay),
			requests: Mutex::new(Vec::new()),
		})
	}

	pub fn requests(&self) -> Vec<Recorded> {
		self.requests.lock().clone()
	}

	pub fn bodies(&self, method: &str) -> Vec<String> {
		self.requests.lock().iter().filter(|r| r.method == method).map(|r| r.body.clone()).collect()
	}

	pub fn count(&self, method: &str) -> usize {
		self.requests.lock().iter().filter(|r| r.method == method).count()
	}
}

#[async_trait]
impl Transport for MockEndpoint {
	async fn post(&self, request: PostRequest) -> ucs::Result<Vec<u8>> {
		assert_eq!(request.url.as_str(), "https://ucs01.example.org/nuova");
		assert_eq!(request.content_type, "application/x-www-form-urlencoded");

		let body = String::from_utf8(request.body).expect("request body is UTF-8");
		let method = root_name(&body).to_string();
		self.requests.lock().push(Recorded {
			method: method.clone(),
			body: body.clone(),
			at: Instant::now(),
		});

		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}

		(self.handler)(&method, &body).map(String::into_bytes).map_err(|message| Error::Transport { message, source: None })
	}
}

pub fn root_name(body: &str) -> &str {
	body.trim_start_matches('<')
		.split(|c: char| c.is_whitespace() || c == '/' || c == '>')
		.next()
		.unwrap_or_default()
}

/// Value of attribute `name` in `body`, if present.
pub fn attr<'a>(body: &'a str, name: &str) -> Option<&'a str> {
	let needle = format!(" {name}=\"");
	let start = body.find(&needle)? + needle.len();
	let len = body[start..].find('"')?;
	Some(&body[start..start + len])
}

pub fn fault(method: &str, code: &str, descr: &str) -> String {
	format!(r#"<{method} cookie="" response="yes" errorCode="{code}" invocationResult="unidentified-fail" errorDescr="{descr}"/>"#)
}

/// Simulated UCS Manager with one account (`admin` / `password`), two
/// chassis and three blades.
pub fn fake_ucs() -> impl Fn(&str, &str) -> Result<String, String> + Send + Sync + 'static {
	let sessions = Arc::new(AtomicUsize::new(0));
	move |method: &str, body: &str| -> Result<String, String> {
		let reply = match method {
			"aaaLogin" => {
				if attr(body, "inName") == Some("admin") && attr(body, "inPassword") == Some("password") {
					login_reply("aaaLogin", sessions.fetch_add(1, Ordering::SeqCst) + 1)
				} else {
					fault("aaaLogin", "551", "Authentication failed")
				}
			}
			"aaaRefresh" => match attr(body, "inCookie") {
				Some(cookie) if cookie.starts_with("cookie-") => login_reply("aaaRefresh", sessions.fetch_add(1, Ordering::SeqCst) + 1),
				_ => fault("aaaRefresh", "552", "Authorization required"),
			},
			"aaaKeepAlive" => format!(r#"<aaaKeepAlive cookie="{}" response="yes"/>"#, attr(body, "cookie").unwrap_or_default()),
			"aaaLogout" => r#"<aaaLogout cookie="" response="yes" outStatus="success"/>"#.to_string(),
			"configResolveDn" => match attr(body, "dn") {
				Some("sys") => concat!(
					r#"<configResolveDn dn="sys" cookie="cookie-1" response="yes"><outConfig>"#,
					r#"<topSystem address="10.0.0.10" dn="sys" name="ucs01" mode="cluster"/>"#,
					r#"</outConfig></configResolveDn>"#,
				)
				.to_string(),
				Some(dn) => format!(r#"<configResolveDn dn="{dn}" cookie="cookie-1" response="yes"><outConfig/></configResolveDn>"#),
				None => fault(method, "103", "missing dn"),
			},
			"configResolveDns" => {
				let mut found = String::new();
				let mut unresolved = String::new();
				for dn in dn_values(body) {
					match chassis(&dn) {
						Some(xml) => found.push_str(&xml),
						None => unresolved.push_str(&format!(r#"<dn value="{dn}"/>"#)),
					}
				}
				format!(
					r#"<configResolveDns cookie="cookie-1" response="yes"><outUnresolved>{unresolved}</outUnresolved><outConfigs>{found}</outConfigs></configResolveDns>"#
				)
			}
			"configResolveClass" => match attr(body, "classId") {
				Some("computeBlade") => format!(
					r#"<configResolveClass cookie="cookie-1" response="yes" classId="computeBlade"><outConfigs>{}</outConfigs></configResolveClass>"#,
					BLADES
				),
				Some(class) => format!(r#"<configResolveClass cookie="cookie-1" response="yes" classId="{class}"><outConfigs/></configResolveClass>"#),
				None => fault(method, "103", "missing classId"),
			},
			"configResolveClasses" => format!(
				r#"<configResolveClasses cookie="cookie-1" response="yes"><outConfigs>{}{}{}</outConfigs></configResolveClasses>"#,
				chassis("sys/chassis-1").unwrap_or_default(),
				chassis("sys/chassis-2").unwrap_or_default(),
				BLADES
			),
			"configResolveChildren" => format!(
				r#"<configResolveChildren cookie="cookie-1" response="yes" classId="computeBlade"><outConfigs>{}</outConfigs></configResolveChildren>"#,
				BLADE_1_1
			),
			other => fault(other, "101", "unknown method"),
		};
		Ok(reply)
	}
}

const BLADE_1_1: &str = r#"<computeBlade dn="sys/chassis-1/blade-1" chassisId="1" slotId="1" model="UCSB-B200-M5" totalMemory="262144"/>"#;

const BLADES: &str = concat!(
	r#"<computeBlade dn="sys/chassis-1/blade-1" chassisId="1" slotId="1" model="UCSB-B200-M5" totalMemory="262144"/>"#,
	r#"<computeBlade dn="sys/chassis-1/blade-2" chassisId="1" slotId="2" model="UCSB-B200-M5" totalMemory="131072"/>"#,
	r#"<computeBlade dn="sys/chassis-2/blade-1" chassisId="2" slotId="1" model="UCSB-B480-M5" totalMemory="524288"/>"#,
);

fn login_reply(method: &str, session: usize) -> String {
	format!(
		r#"<{method} cookie="" response="yes" outCookie="cookie-{session}" outRefreshPeriod="600" outPriv="admin,read-only" outDomains="" outChannel="noencssl" outEvtChannel="noencssl" outSessionId="" outVersion="4.1(3b)" outName="admin"/>"#
	)
}

fn chassis(dn: &str) -> Option<String> {
	let id = match dn {
		"sys/chassis-1" => 1,
		"sys/chassis-2" => 2,
		_ => return None,
	};
	Some(format!(r#"<equipmentChassis dn="{dn}" id="{id}" model="UCSC-C5108" operState="operable"/>"#))
}

fn dn_values(body: &str) -> Vec<String> {
	body.split("<dn value=\"")
		.skip(1)
		.filter_map(|rest| rest.split('"').next())
		.map(str::to_string)
		.collect()
}

/// Routes client logs to the test harness output.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_max_level(tracing::Level::DEBUG)
		.with_test_writer()
		.try_init();
}

pub fn client(endpoint: &Arc<MockEndpoint>) -> Client {
	client_with(endpoint, |config| config)
}

pub fn client_with(endpoint: &Arc<MockEndpoint>, configure: impl FnOnce(Config) -> Config) -> Client {
	init_tracing();
	let transport: Arc<dyn Transport> = endpoint.clone();
	let config = Config::new(ENDPOINT).with_credentials("admin", "password").with_transport(transport);
	Client::new(configure(config)).expect("valid config")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopSystem {
	#[serde(rename = "@dn")]
	pub dn: String,
	#[serde(rename = "@name")]
	pub name: String,
	#[serde(rename = "@address")]
	pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chassis {
	#[serde(rename = "@dn")]
	pub dn: String,
	#[serde(rename = "@id")]
	pub id: u32,
	#[serde(rename = "@operState")]
	pub oper_state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Blade {
	#[serde(rename = "@dn")]
	pub dn: String,
	#[serde(rename = "@chassisId")]
	pub chassis_id: u32,
	#[serde(rename = "@slotId")]
	pub slot_id: u32,
	#[serde(rename = "@totalMemory")]
	pub total_memory: u64,
}

/// Decode target for `outConfigs` documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Inventory {
	#[serde(rename = "equipmentChassis", default)]
	pub chassis: Vec<Chassis>,
	#[serde(rename = "computeBlade", default)]
	pub blades: Vec<Blade>,
}
