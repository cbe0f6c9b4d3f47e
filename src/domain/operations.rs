use crate::domain::exchange::Verb;
use std::fmt;

// Static per-operation configuration. A verb without a path is invalid for
// that operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointConfig {
    pub name: &'static str,
    pub read_path: Option<&'static str>,
    pub create_path: Option<&'static str>,
    pub replace_path: Option<&'static str>,
    pub remove_path: Option<&'static str>,
}

impl EndpointConfig {
    pub const fn read_only(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            read_path: Some(path),
            create_path: None,
            replace_path: None,
            remove_path: None,
        }
    }

    pub fn path_for(&self, verb: Verb) -> Option<&'static str> {
        match verb {
            Verb::Read => self.read_path,
            Verb::Create => self.create_path,
            Verb::Replace => self.replace_path,
            Verb::Remove => self.remove_path,
        }
    }
}

// The operations the portal talks to. All of them are read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DcfCode,
    PrescriptionDisp,
    PrescriptionListSearch,
    ProjectNames,
    SystemSettings,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::DcfCode,
        Operation::PrescriptionDisp,
        Operation::PrescriptionListSearch,
        Operation::ProjectNames,
        Operation::SystemSettings,
    ];

    pub fn name(self) -> &'static str {
        self.config().name
    }

    pub fn config(self) -> EndpointConfig {
        match self {
            Operation::DcfCode => EndpointConfig::read_only("dcf_code", "/mr/dcf_code"),
            Operation::PrescriptionDisp => {
                EndpointConfig::read_only("prescription_disp", "/mr/prescription_disp")
            }
            Operation::PrescriptionListSearch => EndpointConfig::read_only(
                "prescription_list_search",
                "/mr/prescriptionList_search",
            ),
            Operation::ProjectNames => {
                EndpointConfig::read_only("project_names", "/mr/project_name")
            }
            Operation::SystemSettings => {
                EndpointConfig::read_only("system_settings", "/system_setting")
            }
        }
    }

    // Prefix of the session attribute that selects a canned fixture response.
    pub fn fixture_key(self) -> &'static str {
        match self {
            Operation::DcfCode => "getDcfCode",
            Operation::PrescriptionDisp => "getPrescriptionDisp",
            Operation::PrescriptionListSearch => "getPrescriptionListSearch",
            Operation::ProjectNames => "getProjectNames",
            Operation::SystemSettings => "getSystemSettings",
        }
    }

    pub fn fixture_selector_key(self) -> String {
        format!("{}_stub", self.fixture_key())
    }

    // Accepts the operation name or its fixture key.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.name() == name || operation.fixture_key() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
