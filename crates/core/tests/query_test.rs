// Query operations: request shape and two-phase decode.

mod mock_endpoint;

use mock_endpoint::{Blade, Inventory, MockEndpoint, TopSystem, attr, client, fake_ucs, fault};
use serde::Deserialize;
use ucs::{ConfigResolveChildren, ConfigResolveClass, ConfigResolveClasses, ConfigResolveDn, ConfigResolveDns, Error, Filter};

async fn logged_in(endpoint: &std::sync::Arc<MockEndpoint>) -> ucs::Client {
	let client = client(endpoint);
	client.login().await.unwrap();
	client
}

#[tokio::test]
async fn test_resolve_dn_decodes_single_object() {
	let endpoint = MockEndpoint::new(fake_ucs());
	let client = logged_in(&endpoint).await;

	let system: Option<TopSystem> = client.resolve_dn(ConfigResolveDn::new("sys")).await.unwrap();

	assert_eq!(
		system,
		Some(TopSystem {
			dn: "sys".into(),
			name: "ucs01".into(),
			address: "10.0.0.10".into(),
		})
	);
	assert_eq!(
		endpoint.bodies("configResolveDn"),
		vec![r#"<configResolveDn cookie="cookie-1" dn="sys" inHierarchical="false"/>"#.to_string()]
	);
}

#[tokio::test]
async fn test_resolve_dn_unknown_dn_is_none() {
	let endpoint = MockEndpoint::new(fake_ucs());
	let client = logged_in(&endpoint).await;

	let system: Option<TopSystem> = client.resolve_dn(ConfigResolveDn::new("sys/nowhere")).await.unwrap();
	assert_eq!(system, None);
}

#[tokio::test]
async fn test_resolve_dns_reports_unresolved_separately() {
	let endpoint = MockEndpoint::new(fake_ucs());
	let client = logged_in(&endpoint).await;

	let resolved = client
		.resolve_dns::<Inventory>(ConfigResolveDns::new(["sys/chassis-1", "sys/chassis-2", "sys/chassis-9"]))
		.await
		.unwrap();

	let dns: Vec<_> = resolved.objects.chassis.iter().map(|c| c.dn.as_str()).collect();
	assert_eq!(dns, ["sys/chassis-1", "sys/chassis-2"]);
	assert_eq!(resolved.objects.chassis[1].id, 2);
	assert_eq!(resolved.unresolved, vec!["sys/chassis-9".to_string()]);
	assert!(!resolved.is_complete());
}

#[tokio::test]
async fn test_resolve_dns_all_unknown_yields_empty_target() {
	let endpoint = MockEndpoint::new(fake_ucs());
	let client = logged_in(&endpoint).await;

	let resolved = client.resolve_dns::<Inventory>(ConfigResolveDns::new(["a", "b"])).await.unwrap();

	assert_eq!(resolved.objects, Inventory::default());
	assert_eq!(resolved.unresolved, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn test_resolve_class_sends_filter_and_flag() {
	let endpoint = MockEndpoint::new(fake_ucs());
	let client = logged_in(&endpoint).await;

	let request = ConfigResolveClass::new("computeBlade").hierarchical(true).filter(Filter::and([
		Filter::ge("computeBlade", "totalMemory", "131072"),
		Filter::eq("computeBlade", "chassisId", "1"),
	]));
	let inventory: Inventory = client.resolve_class(request).await.unwrap();

	assert_eq!(inventory.blades.len(), 3);
	assert!(inventory.chassis.is_empty());

	let body = endpoint.bodies("configResolveClass").pop().unwrap();
	assert_eq!(attr(&body, "inHierarchical"), Some("true"));
	assert!(
		body.contains(
			r#"<inFilter><and><ge class="computeBlade" property="totalMemory" value="131072"/><eq class="computeBlade" property="chassisId" value="1"/></and></inFilter>"#
		),
		"unexpected body: {body}"
	);
}

#[tokio::test]
async fn test_resolve_class_without_matches() {
	let endpoint = MockEndpoint::new(fake_ucs());
	let client = logged_in(&endpoint).await;

	let inventory: Inventory = client.resolve_class(ConfigResolveClass::new("lsServer")).await.unwrap();
	assert_eq!(inventory, Inventory::default());
}

#[tokio::test]
async fn test_resolve_classes_mixes_classes() {
	let endpoint = MockEndpoint::new(fake_ucs());
	let client = logged_in(&endpoint).await;

	let inventory: Inventory = client
		.resolve_classes(ConfigResolveClasses::new(["equipmentChassis", "computeBlade"]))
		.await
		.unwrap();

	assert_eq!(inventory.chassis.len(), 2);
	assert_eq!(inventory.blades.len(), 3);
	assert!(endpoint.bodies("configResolveClasses")[0].contains(r#"<inIds><Id value="equipmentChassis"/><Id value="computeBlade"/></inIds>"#));
}

#[tokio::test]
async fn test_resolve_children_names_parent() {
	#[derive(Deserialize)]
	struct Blades {
		#[serde(rename = "computeBlade", default)]
		blades: Vec<Blade>,
	}

	let endpoint = MockEndpoint::new(fake_ucs());
	let client = logged_in(&endpoint).await;

	let request = ConfigResolveChildren::new("sys/chassis-1", "computeBlade").filter(Filter::eq("computeBlade", "slotId", "1"));
	let children: Blades = client.resolve_children(request).await.unwrap();

	assert_eq!(children.blades.len(), 1);
	assert_eq!(children.blades[0].slot_id, 1);
	assert_eq!(children.blades[0].total_memory, 262_144);

	let body = endpoint.bodies("configResolveChildren").pop().unwrap();
	assert_eq!(attr(&body, "inDn"), Some("sys/chassis-1"));
	assert_eq!(attr(&body, "classId"), Some("computeBlade"));
}

#[tokio::test]
async fn test_query_fault_is_remote_error() {
	let endpoint = MockEndpoint::new(|method, body| match method {
		"configResolveClass" => Ok(fault(method, "552", "Authorization required")),
		_ => fake_ucs()(method, body),
	});
	let client = logged_in(&endpoint).await;

	let err = client.resolve_class::<Inventory>(ConfigResolveClass::new("computeBlade")).await.unwrap_err();

	assert_eq!(err.remote_code(), Some("552"));
	assert_eq!(err.fault().unwrap().invocation_result, "unidentified-fail");
}

#[tokio::test]
async fn test_shape_mismatch_is_decoding_error() {
	#[derive(Debug, Deserialize)]
	struct Strict {
		#[serde(rename = "@doesNotExist")]
		_missing: String,
	}

	let endpoint = MockEndpoint::new(fake_ucs());
	let client = logged_in(&endpoint).await;

	let err = client.resolve_dn::<Strict>(ConfigResolveDn::new("sys")).await.unwrap_err();
	assert!(matches!(err, Error::Decoding(_)), "got {err:?}");
}

#[tokio::test]
async fn test_queries_require_login() {
	let endpoint = MockEndpoint::new(fake_ucs());
	let client = client(&endpoint);

	let err = client.resolve_class::<Inventory>(ConfigResolveClass::new("computeBlade")).await.unwrap_err();
	assert!(matches!(err, Error::NotAuthenticated));
	assert!(endpoint.requests().is_empty());
}
