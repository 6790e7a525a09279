use serde_json::Value;

use crate::errors::ExplorerError;
use crate::explorer::{ExplorerClient, QueryParams};

const MODULE: &str = "contract";

/// Source verification submission
///
/// Field names on the wire keep the explorer's spelling, including
/// `constructorArguements`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifySourceRequest {
    pub contract_address: String,
    pub source_code: String,
    /// `solidity-single-file` or `solidity-standard-json-input`
    pub code_format: String,
    pub contract_name: String,
    pub compiler_version: String,
    /// ABI-encoded constructor arguments, without `0x`
    pub constructor_arguments: Option<String>,
}

impl VerifySourceRequest {
    fn params(&self) -> QueryParams {
        QueryParams::new()
            .with("contractaddress", self.contract_address.as_str())
            .with("sourceCode", self.source_code.as_str())
            .with("codeformat", self.code_format.as_str())
            .with("contractname", self.contract_name.as_str())
            .with("compilerversion", self.compiler_version.as_str())
            .with_opt("constructorArguements", self.constructor_arguments.as_deref())
    }
}

/// `module=contract` endpoints
#[derive(Debug, Clone, Copy)]
pub struct Contracts<'a> {
    client: &'a ExplorerClient,
}

impl<'a> Contracts<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// ABI of a verified contract, as a JSON string.
    pub async fn abi(&self, address: &str) -> Result<Value, ExplorerError> {
        self.by_address("getabi", address).await
    }

    /// Source code and compiler metadata of a verified contract.
    pub async fn source_code(&self, address: &str) -> Result<Value, ExplorerError> {
        self.by_address("getsourcecode", address).await
    }

    /// Creator and creation transaction of up to five contracts.
    pub async fn contract_creation(&self, addresses: &[&str]) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("contractaddresses", addresses.join(","));
        self.client
            .request(MODULE, "getcontractcreation", params)
            .await
    }

    /// Submits source code for verification; returns a GUID. Never cached.
    pub async fn verify_source_code(
        &self,
        request: &VerifySourceRequest,
    ) -> Result<Value, ExplorerError> {
        self.client
            .request(MODULE, "verifysourcecode", request.params())
            .await
    }

    /// Status of a verification submission.
    pub async fn check_verify_status(&self, guid: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("guid", guid);
        self.client.request(MODULE, "checkverifystatus", params).await
    }

    /// Submits a proxy contract for verification. Never cached.
    pub async fn verify_proxy_contract(
        &self,
        address: &str,
        expected_implementation: Option<&str>,
    ) -> Result<Value, ExplorerError> {
        let params = QueryParams::new()
            .with("address", address)
            .with_opt("expectedimplementation", expected_implementation);
        self.client
            .request(MODULE, "verifyproxycontract", params)
            .await
    }

    /// Status of a proxy verification submission.
    pub async fn check_proxy_verification(&self, guid: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("guid", guid);
        self.client
            .request(MODULE, "checkproxyverification", params)
            .await
    }

    async fn by_address(&self, action: &str, address: &str) -> Result<Value, ExplorerError> {
        let params = QueryParams::new().with("address", address);
        self.client.request(MODULE, action, params).await
    }
}
