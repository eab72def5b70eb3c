use candid::Principal;

pub struct ICNetwork;

impl ICNetwork {
    /// return the current time in nanoseconds
    pub fn get_time() -> u64 {
        ic_cdk::api::time()
    }

    /// Principal ID of the caller.
    pub fn caller() -> Principal {
        ic_cdk::api::msg_caller()
    }

    /// Check if the caller is a controller
    pub fn is_caller_controller() -> bool {
        ic_cdk::api::is_controller(&ICNetwork::caller())
    }

    pub fn info_log(msg: &str) {
        ic_cdk::println!("INFO: {}", msg);
    }

    pub fn error_log(msg: &str) {
        ic_cdk::eprintln!("ERROR: {}", msg);
    }
}
