//! RFC 5322 address grammar.
//!
//! Every production is a function `fn(&[u8]) -> MatchResult<'_>` built from
//! the combinators in [`crate::rd`]. Alternatives are tried with
//! [`match_longest`](crate::rd::match_longest), so the current and obsolete
//! forms of a production compete and the longer match wins; on a tie the
//! current form wins because it is listed first.
//!
//! The grammar only recognizes input. Values are constructed afterwards by
//! the semantic actions, which walk the [`Match`](crate::rd::Match) tree
//! using the tags and names assigned here.

mod address;
mod lexical;
mod obsolete;
mod rfc5234;

pub use address::{
    match_addr_spec, match_address, match_address_list, match_angle_addr, match_display_name,
    match_domain, match_domain_literal, match_dtext, match_group, match_group_list,
    match_local_part, match_mailbox, match_mailbox_list, match_name_addr,
};
pub use lexical::{
    is_atext, match_atext, match_atom, match_ccontent, match_cfws, match_comment, match_ctext,
    match_dot_atom, match_dot_atom_text, match_fws, match_phrase, match_qcontent, match_qtext,
    match_quoted_pair, match_quoted_string, match_word, with_comment_limit,
};
pub use obsolete::{
    match_obs_addr_list, match_obs_angle_addr, match_obs_ctext, match_obs_domain,
    match_obs_domain_list, match_obs_dtext, match_obs_fws, match_obs_group_list,
    match_obs_local_part, match_obs_mbox_list, match_obs_no_ws_ctl, match_obs_phrase,
    match_obs_qp, match_obs_qtext, match_obs_route,
};
pub use rfc5234::{
    match_alpha, match_cr, match_crlf, match_digit, match_dquote, match_htab, match_lf,
    match_sp, match_vchar, match_wsp,
};
