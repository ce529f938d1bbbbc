use nom::{
    IResult, Parser,
    bytes::complete::take_till1,
    character::complete::multispace0,
    combinator::all_consuming,
    multi::many0,
    sequence::{delimited, terminated},
};

use super::AheadBehind;
use crate::{Res, error::Error};

/// Parses `git rev-list --left-right --count` output: `<behind> <ahead>`.
pub fn parse_ahead_behind(out: &str) -> Res<AheadBehind> {
    let tokens = match tokens(out) {
        Ok((_, tokens)) => tokens,
        Err(_) => return Err(Error::AheadBehindTokenCount(out.to_string())),
    };

    let [behind, ahead] = tokens[..] else {
        return Err(Error::AheadBehindTokenCount(out.to_string()));
    };

    Ok(AheadBehind {
        behind: count("behind", behind)?,
        ahead: count("ahead", ahead)?,
    })
}

fn tokens(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(delimited(
        multispace0,
        many0(terminated(
            take_till1(|c: char| c.is_whitespace()),
            multispace0,
        )),
        multispace0,
    ))
    .parse(input)
}

fn count(side: &'static str, token: &str) -> Res<u32> {
    token
        .parse()
        .map_err(|e| Error::AheadBehindCount(side, token.to_string(), e))
}
