use dossier_observe::logging;

// Lives in its own integration binary so nothing else has touched the global
// dispatcher before the first call.
#[test]
fn init_is_idempotent() {
	assert!(logging::init("info"));
	assert!(!logging::init("info"));
	assert!(!logging::init("debug"));
}
