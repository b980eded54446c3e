use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// 參加者：以名字識別，地址視為不透明字串（通常是 email）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    name: String,
    address: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// 上一輪的 giver -> receiver 名字對照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorAssignments {
    pairs: HashMap<String, String>,
}

impl PriorAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, giver: impl Into<String>, receiver: impl Into<String>) {
        self.pairs.insert(giver.into(), receiver.into());
    }

    pub fn receiver_for(&self, giver: &str) -> Option<&str> {
        self.pairs.get(giver).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 不在名單內的 giver 條目（不影響抽籤，只用於記錄）
    pub fn unmatched_givers<'a>(&'a self, participants: &[Participant]) -> Vec<&'a str> {
        let mut unmatched: Vec<&str> = self
            .pairs
            .keys()
            .filter(|giver| !participants.iter().any(|p| p.name() == giver.as_str()))
            .map(String::as_str)
            .collect();
        unmatched.sort_unstable();
        unmatched
    }
}

impl<G: Into<String>, R: Into<String>> FromIterator<(G, R)> for PriorAssignments {
    fn from_iter<I: IntoIterator<Item = (G, R)>>(iter: I) -> Self {
        let mut prior = PriorAssignments::new();
        for (giver, receiver) in iter {
            prior.insert(giver, receiver);
        }
        prior
    }
}

/// 完整的 giver -> receiver 配對，依原始名單順序保存
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pairs: Vec<(Participant, Participant)>,
}

impl Assignment {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn record(&mut self, giver: Participant, receiver: Participant) {
        self.pairs.push((giver, receiver));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn receiver_for(&self, giver: &str) -> Option<&Participant> {
        self.pairs
            .iter()
            .find(|(g, _)| g.name() == giver)
            .map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Participant, &Participant)> {
        self.pairs.iter().map(|(g, r)| (g, r))
    }

    pub fn rows(&self) -> Vec<AssignmentRow> {
        self.iter()
            .map(|(giver, receiver)| AssignmentRow::from_pair(giver, receiver))
            .collect()
    }
}

/// 輸出檔的一列，欄位名稱沿用既有的試算表格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    #[serde(rename = "Employee_Name")]
    pub giver_name: String,
    #[serde(rename = "Employee_EmailID")]
    pub giver_address: String,
    #[serde(rename = "Secret_Child_Name")]
    pub receiver_name: String,
    #[serde(rename = "Secret_Child_EmailID")]
    pub receiver_address: String,
}

impl AssignmentRow {
    pub fn from_pair(giver: &Participant, receiver: &Participant) -> Self {
        Self {
            giver_name: giver.name().to_string(),
            giver_address: giver.address().to_string(),
            receiver_name: receiver.name().to_string(),
            receiver_address: receiver.address().to_string(),
        }
    }
}

/// 輸入檔的欄位名稱；比對時忽略大小寫與空白
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub giver_name: String,
    pub giver_address: String,
    pub receiver_name: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            giver_name: "Employee_Name".to_string(),
            giver_address: "Employee_EmailID".to_string(),
            receiver_name: "Secret_Child_Name".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrawInput {
    pub participants: Vec<Participant>,
    pub prior: PriorAssignments,
}

#[derive(Debug, Clone)]
pub struct DrawResult {
    pub assignment: Assignment,
    pub attempts_used: usize,
}
