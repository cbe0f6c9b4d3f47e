use serde::{Deserialize, Serialize};

// The serialization within this layer is a dependency leak, but the wire names
// are the contract with the API, so the models carry them directly.

// Maximum number of rows fetched per list search.
pub const SEARCH_PAGE_SIZE: u32 = 50;

// Request for the DCF code list of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DcfCodeRequest {
    pub kkk_cod: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcfCodeResponse {
    pub dcf_cod: Vec<String>,
}

// Request for the detail screen; `requestparameter` is the opaque row key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionDispRequest {
    pub requestparameter: String,
}

// Detail of a single shipment record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrescriptionDispResponse {
    // Project name.
    pub pre_kkk_nm: String,
    // Delivery destination.
    pub pre_nhn_nm: String,
    // Customer code.
    pub pre_tok_cod: String,
    // Slip date.
    pub pre_dnp_ymd: String,
    // Slip number.
    pub pre_dnp_no: String,
    // Product / standard capacity.
    pub pre_syh_kkk_yry: String,
    pub pre_syh_cod: String,
    // Quantity.
    pub pre_hnb_num: String,
    pub pre_dcf_cod: String,
    // Prescriber name (formal and short).
    pub pre_ful_nm: String,
    pub pre_nm: String,
    // Prescriber unknown code and reason.
    pub pre_cod: i64,
    pub pre_ryu: String,
    // Prescribing doctor.
    pub pre_dr: String,
    pub pre_dr_cod: i64,
    pub pre_dr_input_flg: i64,
    // Department.
    pub pre_dp: String,
    pub pre_dp_cod: i64,
    // Notes for the field representative.
    pub pre_mr_ren: String,
    pub pre_stat_flg: i64,
}

// Paged list search. `offset` is the 1-based index of the first row wanted.
// Zero/empty filters are not transmitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionListSearchRequest {
    pub limit: u32,
    pub offset: u32,
    // Project id.
    pub kkk_cod: String,
    pub dcf_cod: String,
    // Sales date range, YYYYMMDD.
    pub urg_ymd_stt: String,
    pub urg_ymd_end: String,
}

impl Default for PrescriptionListSearchRequest {
    fn default() -> Self {
        Self {
            limit: SEARCH_PAGE_SIZE,
            offset: 1,
            kkk_cod: String::new(),
            dcf_cod: String::new(),
            urg_ymd_stt: String::new(),
            urg_ymd_end: String::new(),
        }
    }
}

impl PrescriptionListSearchRequest {
    // Request for the page following `response`, or None when it was the last one.
    pub fn next_page(&self, response: &PrescriptionListSearchResponse) -> Option<Self> {
        let rows = response.shm_inf.len() as u64;
        let last_row = u64::from(self.offset.saturating_sub(1)) + rows;
        if rows < u64::from(self.limit) || last_row >= response.all_su {
            return None;
        }
        Some(Self {
            offset: self.offset + rows as u32,
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrescriptionListSearchResponse {
    // Total number of matching rows.
    pub all_su: u64,
    pub sta_row: u64,
    pub end_row: u64,
    pub shm_inf: Vec<PrescriptionInfo>,
    // Whether prescribing-doctor input is disabled for this user.
    pub shm_dr_input_disabled_flg: i64,
}

// One row of the list search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrescriptionInfo {
    pub shm_kkk_cod: String,
    pub shm_kkk_nm: String,
    // Sales department / branch / section.
    pub shm_egb_nm: String,
    pub shm_stn_nm: String,
    pub shm_ka_nm: String,
    pub shm_tts_nm: String,
    // Slip numbers.
    pub shm_dpy_bno: String,
    pub shm_dpy_kno_gb: String,
    pub shm_dpy_no: String,
    pub shm_dpy_rno: String,
    // Sales date.
    pub shm_urg_ymd: String,
    pub shm_hbm_nm: String,
    pub shm_syh_nm: String,
    pub shm_syh_kkk_yry_nm: String,
    pub shm_nhn_cod: String,
    pub shm_nhn_nm: String,
    pub shm_hnb_nm: String,
    pub shm_nm: String,
    pub shm_dcf_cod: String,
    pub shm_dr_nm: String,
    pub shm_mail_adr_mr: String,
    // Due date.
    pub shm_kkn_ymd: String,
    pub shm_stat_cod: String,
    // Entered / updated timestamps.
    pub shm_nrk_ymd: String,
    pub shm_ksn_ymd: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectNamesRequest {
    pub dcf_cod: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectNamesResponse {
    pub lst_kkk_inf: Vec<ProjectInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub kkk_cod: String,
    pub kkk_nm: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSettingsRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettingsResponse {
    pub pass_change_url: String,
    pub logout_url: String,
}

// Display label of a record status code.
pub fn status_label(code: &str) -> &'static str {
    match code {
        "0" => "未",
        "1" => "済",
        "2" => "済（不明あり）",
        "3" => "再",
        "4" => "再（不明あり）",
        _ => "",
    }
}
