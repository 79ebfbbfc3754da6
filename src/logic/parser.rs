use std::{collections::BTreeSet, path::PathBuf};

use super::{
    ParseError,
    command::{
        Add, Backup, ChangePrivacy, Command, Delete, Edit, EditPersonDescriptor, Favourite, Find,
        Lock, PrivacyDescriptor, RemoveTag, SetRemark, Unlock,
    },
};
use crate::domain::{Field, Index, Person, Remark, Tag};

mod tokenizer;

use tokenizer::{
    ADDRESS, ArgumentMultimap, EMAIL, NAME, PASSWORD, PHONE, Prefix, REMARK, TAG, tokenize,
};

/// Parses one line of user input into a command.
///
/// # Errors
///
/// Returns an error if the command word is unknown, the arguments do not
/// match the command's syntax, or a field value is invalid.
pub(crate) fn parse(input: &str) -> Result<Command, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::InvalidFormat(Command::HELP_USAGE));
    }
    let (word, args) = input
        .split_once(char::is_whitespace)
        .unwrap_or((input, ""));

    match word {
        "add" | "a" => parse_add(args),
        "edit" | "e" => parse_edit(args),
        "delete" | "d" => {
            parse_index(args, Delete::USAGE).map(|index| Command::Delete(Delete { index }))
        }
        "clear" | "c" => Ok(Command::Clear),
        "list" | "l" => Ok(Command::List),
        "find" | "f" => parse_find(args),
        "favourite" | "fav" => {
            parse_index(args, Favourite::USAGE).map(|index| Command::Favourite(Favourite { index }))
        }
        "remark" | "rm" => parse_remark(args),
        "changeprivacy" | "cp" => parse_change_privacy(args),
        "removetag" | "rt" => parse_remove_tag(args),
        "backup" | "b" => Ok(parse_backup(args)),
        "undo" | "u" => Ok(Command::Undo),
        "redo" | "r" => Ok(Command::Redo),
        "lock" | "lk" => parse_password(args, Lock::USAGE).map(|pw| Command::Lock(Lock::new(pw))),
        "unlock" | "ul" => {
            parse_password(args, Unlock::USAGE).map(|pw| Command::Unlock(Unlock::new(pw)))
        }
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        _ => Err(ParseError::UnknownCommand),
    }
}

fn parse_index(text: &str, usage: &'static str) -> Result<Index, ParseError> {
    text.parse().map_err(|e| {
        tracing::debug!("{e}");
        ParseError::InvalidFormat(usage)
    })
}

fn parse_tags(values: &[String]) -> Result<BTreeSet<Tag>, ParseError> {
    values
        .iter()
        .map(|value| Tag::new(value.clone()).map_err(ParseError::from))
        .collect()
}

fn parse_add(args: &str) -> Result<Command, ParseError> {
    const REQUIRED: [Prefix; 4] = [NAME, PHONE, EMAIL, ADDRESS];

    let args = tokenize(args, &[NAME, PHONE, EMAIL, ADDRESS, REMARK, TAG]);
    if !args.has_all(&REQUIRED) || !args.preamble().is_empty() {
        return Err(ParseError::InvalidFormat(Add::USAGE));
    }

    let required = |prefix| args.value(prefix).unwrap_or_default();
    let mut person = Person::new(
        required(NAME).parse()?,
        required(PHONE).parse()?,
        required(EMAIL).parse()?,
        required(ADDRESS).parse()?,
    );
    if let Some(remark) = args.value(REMARK) {
        person.remark = Field::parse(remark)?;
    }
    person.tags = parse_tags(args.all_values(TAG))?;

    Ok(Command::Add(Add { person }))
}

fn parse_edit(args: &str) -> Result<Command, ParseError> {
    let args = tokenize(args, &[NAME, PHONE, EMAIL, ADDRESS, REMARK, TAG]);
    let index = parse_index(args.preamble(), Edit::USAGE)?;

    let descriptor = EditPersonDescriptor {
        name: args.value(NAME).map(str::parse).transpose()?,
        phone: args.value(PHONE).map(str::parse).transpose()?,
        email: args.value(EMAIL).map(str::parse).transpose()?,
        address: args.value(ADDRESS).map(str::parse).transpose()?,
        remark: args.value(REMARK).map(str::parse).transpose()?,
        tags: parse_edited_tags(&args)?,
    };
    if !descriptor.is_any_field_edited() {
        return Err(ParseError::NoFieldsEdited);
    }

    Ok(Command::Edit(Edit { index, descriptor }))
}

/// A lone empty `t/` clears the tags; no `t/` at all leaves them alone.
fn parse_edited_tags(args: &ArgumentMultimap) -> Result<Option<BTreeSet<Tag>>, ParseError> {
    match args.all_values(TAG) {
        [] => Ok(None),
        [only] if only.is_empty() => Ok(Some(BTreeSet::new())),
        values => parse_tags(values).map(Some),
    }
}

fn parse_find(args: &str) -> Result<Command, ParseError> {
    let keywords: Vec<String> = args.split_whitespace().map(str::to_string).collect();
    if keywords.is_empty() {
        return Err(ParseError::InvalidFormat(Find::USAGE));
    }
    Ok(Command::Find(Find { keywords }))
}

fn parse_remark(args: &str) -> Result<Command, ParseError> {
    let args = tokenize(args, &[REMARK]);
    let index = parse_index(args.preamble(), SetRemark::USAGE)?;
    let remark: Remark = args
        .value(REMARK)
        .ok_or(ParseError::InvalidFormat(SetRemark::USAGE))?
        .parse()?;
    Ok(Command::Remark(SetRemark { index, remark }))
}

fn parse_change_privacy(args: &str) -> Result<Command, ParseError> {
    let args = tokenize(args, &[NAME, PHONE, EMAIL, ADDRESS, REMARK]);
    let index = parse_index(args.preamble(), ChangePrivacy::USAGE)?;

    let flag = |prefix| args.value(prefix).map(parse_privacy).transpose();
    let privacy = PrivacyDescriptor {
        name: flag(NAME)?,
        phone: flag(PHONE)?,
        email: flag(EMAIL)?,
        address: flag(ADDRESS)?,
        remark: flag(REMARK)?,
    };
    if !privacy.is_any_field_set() {
        return Err(ParseError::NoPrivacyChanged);
    }

    Ok(Command::ChangePrivacy(ChangePrivacy { index, privacy }))
}

fn parse_privacy(value: &str) -> Result<bool, ParseError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseError::InvalidFormat(ChangePrivacy::USAGE))
    }
}

fn parse_remove_tag(args: &str) -> Result<Command, ParseError> {
    let args = args.trim();
    if args.is_empty() {
        return Err(ParseError::InvalidFormat(RemoveTag::USAGE));
    }
    let tag = Tag::new(args.to_string())?;
    Ok(Command::RemoveTag(RemoveTag { tag }))
}

fn parse_backup(args: &str) -> Command {
    let args = args.trim();
    let path = (!args.is_empty()).then(|| PathBuf::from(args));
    Command::Backup(Backup { path })
}

fn parse_password(args: &str, usage: &'static str) -> Result<String, ParseError> {
    let args = tokenize(args, &[PASSWORD]);
    match args.value(PASSWORD) {
        Some(password) if args.preamble().is_empty() => Ok(password.to_string()),
        _ => Err(ParseError::InvalidFormat(usage)),
    }
}
