//! Conversion between the flat record format and [`GraphDocument`]

use super::{ActionRecord, ChoiceRecord, GraphDocument, NpcLineRecord, ParamKind, PlayerSetRecord};
use crate::error::{Error, Result};
use crate::formats::record::RecordDocument;

/// Null sentinel for reference fields
const NO_LINK: i64 = -1;

fn count(doc: &RecordDocument, key: &str) -> Result<usize> {
    let value = doc.int(key)?;
    usize::try_from(value).map_err(|_| Error::OutOfRange {
        key: key.to_string(),
        value,
    })
}

fn id(doc: &RecordDocument, key: &str) -> Result<i32> {
    narrow(key, doc.int(key)?)
}

fn narrow(key: &str, value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::OutOfRange {
        key: key.to_string(),
        value,
    })
}

fn index_value(key: &str, value: i64) -> Result<Option<usize>> {
    match value {
        NO_LINK => Ok(None),
        v if v < 0 => Err(Error::InvalidIndex {
            key: key.to_string(),
            value: v,
        }),
        v => usize::try_from(v).map(Some).map_err(|_| Error::OutOfRange {
            key: key.to_string(),
            value: v,
        }),
    }
}

/// Required reference field
fn link(doc: &RecordDocument, key: &str) -> Result<Option<usize>> {
    index_value(key, doc.int(key)?)
}

/// Reference field the editor only writes when set
fn opt_link(doc: &RecordDocument, key: &str) -> Result<Option<usize>> {
    match doc.opt_int(key)? {
        Some(value) => index_value(key, value),
        None => Ok(None),
    }
}

fn encode_link(link: Option<usize>) -> i64 {
    link.map_or(NO_LINK, |i| i as i64)
}

impl GraphDocument {
    /// Read a record document into the typed schema.
    ///
    /// Required fields missing from the record fail the whole conversion.
    /// Optional fields (tags, extra data, action extras, late-added links)
    /// default to empty or "no link".
    ///
    /// # Errors
    /// Returns an error on a missing required field, a mistyped value, or a
    /// malformed reference index.
    pub fn from_record(doc: &RecordDocument) -> Result<Self> {
        let player_count = count(doc, "playerDiags")?;
        let npc_count = count(doc, "npcDiags")?;
        let action_count = match doc.opt_int("actionNodes")? {
            Some(value) => usize::try_from(value).map_err(|_| Error::OutOfRange {
                key: "actionNodes".to_string(),
                value,
            })?,
            None => 0,
        };

        let mut graph = GraphDocument::new(id(doc, "startPoint")?);
        graph.load_tag = doc.opt_str("loadTag")?.unwrap_or_default().to_string();

        for i in 0..player_count {
            let choice_count = count(doc, &format!("pd_comSize_{i}"))?;
            let mut choices = Vec::with_capacity(choice_count);
            for c in 0..choice_count {
                let prefix = format!("pd_{i}_com_{c}");
                choices.push(ChoiceRecord {
                    text: doc.str(&format!("{prefix}text"))?.to_string(),
                    extra_data: doc
                        .opt_str(&format!("{prefix}extraD"))?
                        .unwrap_or_default()
                        .to_string(),
                    input_set: link(doc, &format!("{prefix}iSet"))?,
                    answer: link(doc, &format!("{prefix}oAns"))?,
                    action: opt_link(doc, &format!("{prefix}oAct"))?,
                });
            }
            graph.player_sets.push(PlayerSetRecord {
                id: id(doc, &format!("pd_ID_{i}"))?,
                tag: doc
                    .opt_str(&format!("pd_pTag_{i}"))?
                    .unwrap_or_default()
                    .to_string(),
                choices,
            });
        }

        for i in 0..npc_count {
            graph.npc_lines.push(NpcLineRecord {
                id: id(doc, &format!("nd_ID_{i}"))?,
                text: doc.str(&format!("nd_text_{i}"))?.to_string(),
                extra_data: doc.str(&format!("nd_extraData_{i}"))?.to_string(),
                tag: doc
                    .opt_str(&format!("nd_tag_{i}"))?
                    .unwrap_or_default()
                    .to_string(),
                next_set: link(doc, &format!("nd_oSet_{i}"))?,
                next_line: opt_link(doc, &format!("nd_oNPC_{i}"))?,
                action: opt_link(doc, &format!("nd_oAct_{i}"))?,
            });
        }

        for i in 0..action_count {
            let kind_key = format!("ac_paramT_{i}");
            let kind_code = doc.int(&kind_key)?;
            let param_kind = ParamKind::from_code(kind_code).ok_or(Error::InvalidParamKind {
                action: i,
                kind: kind_code,
            })?;

            let override_key = format!("ac_ovrStartNode_{i}");
            let override_start = match doc.opt_int(&override_key)? {
                Some(NO_LINK) | None => None,
                Some(value) => Some(narrow(&override_key, value)?),
            };

            let rename = doc
                .opt_str(&format!("ac_renameDialogue_{i}"))?
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            let param_int_key = format!("ac_pInt_{i}");
            graph.actions.push(ActionRecord {
                id: id(doc, &format!("ac_ID_{i}"))?,
                target: doc.str(&format!("ac_goName_{i}"))?.to_string(),
                method: doc.str(&format!("ac_meth_{i}"))?.to_string(),
                pause_here: doc.bool(&format!("ac_pause_{i}"))?,
                param_kind,
                param_bool: doc.bool(&format!("ac_pBool_{i}"))?,
                param_string: doc.str(&format!("ac_pString_{i}"))?.to_string(),
                param_int: narrow(&param_int_key, doc.int(&param_int_key)?)?,
                param_float: doc.float(&format!("ac_pFloat_{i}"))?,
                override_start,
                rename,
                next_set: link(doc, &format!("ac_oSet_{i}"))?,
                next_line: opt_link(doc, &format!("ac_oNPC_{i}"))?,
                next_action: opt_link(doc, &format!("ac_oAct_{i}"))?,
            });
        }

        Ok(graph)
    }

    /// Write the document back out in the flat record format.
    ///
    /// Every key is written, including optional ones, so the output loads
    /// in older readers that expect the full field set.
    #[must_use]
    pub fn to_record(&self) -> RecordDocument {
        let mut doc = RecordDocument::new();

        doc.insert("playerDiags", self.player_sets.len() as i64);
        doc.insert("npcDiags", self.npc_lines.len() as i64);
        doc.insert("actionNodes", self.actions.len() as i64);
        doc.insert("startPoint", self.start_point);
        doc.insert("loadTag", self.load_tag.as_str());

        for (i, set) in self.player_sets.iter().enumerate() {
            doc.insert(format!("pd_pTag_{i}"), set.tag.as_str());
            doc.insert(format!("pd_comSize_{i}"), set.choices.len() as i64);
            doc.insert(format!("pd_ID_{i}"), set.id);
            for (c, choice) in set.choices.iter().enumerate() {
                let prefix = format!("pd_{i}_com_{c}");
                doc.insert(format!("{prefix}text"), choice.text.as_str());
                doc.insert(format!("{prefix}extraD"), choice.extra_data.as_str());
                doc.insert(format!("{prefix}iSet"), encode_link(choice.input_set));
                doc.insert(format!("{prefix}oAns"), encode_link(choice.answer));
                doc.insert(format!("{prefix}oAct"), encode_link(choice.action));
            }
        }

        for (i, line) in self.npc_lines.iter().enumerate() {
            doc.insert(format!("nd_tag_{i}"), line.tag.as_str());
            doc.insert(format!("nd_text_{i}"), line.text.as_str());
            doc.insert(format!("nd_ID_{i}"), line.id);
            doc.insert(format!("nd_extraData_{i}"), line.extra_data.as_str());
            doc.insert(format!("nd_oSet_{i}"), encode_link(line.next_set));
            doc.insert(format!("nd_oNPC_{i}"), encode_link(line.next_line));
            doc.insert(format!("nd_oAct_{i}"), encode_link(line.action));
        }

        for (i, action) in self.actions.iter().enumerate() {
            doc.insert(format!("ac_ID_{i}"), action.id);
            doc.insert(format!("ac_meth_{i}"), action.method.as_str());
            doc.insert(format!("ac_goName_{i}"), action.target.as_str());
            doc.insert(format!("ac_pause_{i}"), action.pause_here);
            doc.insert(format!("ac_pBool_{i}"), action.param_bool);
            doc.insert(format!("ac_pString_{i}"), action.param_string.as_str());
            doc.insert(format!("ac_pInt_{i}"), action.param_int);
            doc.insert(format!("ac_pFloat_{i}"), action.param_float);
            doc.insert(
                format!("ac_ovrStartNode_{i}"),
                i64::from(action.override_start.unwrap_or(-1)),
            );
            doc.insert(
                format!("ac_renameDialogue_{i}"),
                action.rename.clone().unwrap_or_default(),
            );
            doc.insert(format!("ac_paramT_{i}"), action.param_kind.code());
            doc.insert(format!("ac_oSet_{i}"), encode_link(action.next_set));
            doc.insert(format!("ac_oNPC_{i}"), encode_link(action.next_line));
            doc.insert(format!("ac_oAct_{i}"), encode_link(action.next_action));
        }

        doc
    }
}
