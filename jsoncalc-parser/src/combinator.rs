//! Generic parser combinator framework
//!
//! A parser here is any function `S -> Result<Option<(S, T)>, E>` over a
//! [`Stream`]. The three outcomes are kept strictly apart:
//!
//! * `Err(e)`: a hard error; combinators propagate it unchanged and never
//!   turn it back into a plain non-match,
//! * `Ok(None)`: the parser did not match; the input is untouched and the
//!   caller may try an alternative,
//! * `Ok(Some((rest, value)))`: the parser matched, consuming the difference
//!   between the input and `rest`.
//!
//! The same framework drives both layers of the pipeline: the tokenizer runs
//! it over `&str`, the grammar over `&[Token]`.

/// Outcome of a single parser application.
pub type ParseOutcome<S, T, E> = Result<Option<(S, T)>, E>;

/// A matched prefix: the remaining stream and the produced value.
pub fn matched<S, T, E>(rest: S, value: T) -> ParseOutcome<S, T, E> {
    Ok(Some((rest, value)))
}

/// A clean non-match, leaving the input for an alternative.
pub fn no_match<S, T, E>() -> ParseOutcome<S, T, E> {
    Ok(None)
}

/// Input that parsers consume from the front.
///
/// Implementations are cheap handles (string slices, token slices); cloning
/// one never copies the underlying data.
pub trait Stream: Clone {
    /// Number of unconsumed items.
    fn len(&self) -> usize;

    /// True when nothing is left to consume.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Stream for &str {
    fn len(&self) -> usize {
        str::len(self)
    }
}

impl<T> Stream for &[T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

/// Anything that can be applied to a stream.
///
/// Implemented for every `Fn(S) -> ParseOutcome<S, T, E>`, so plain functions
/// and closures are parsers without further ceremony.
pub trait Parser<S: Stream, E> {
    /// The value a successful match produces.
    type Output;

    /// Apply this parser to the front of `input`.
    fn parse(&self, input: S) -> ParseOutcome<S, Self::Output, E>;
}

impl<S: Stream, E, T, F> Parser<S, E> for F
where
    F: Fn(S) -> ParseOutcome<S, T, E>,
{
    type Output = T;

    fn parse(&self, input: S) -> ParseOutcome<S, T, E> {
        self(input)
    }
}

/// Errors the framework itself can raise.
pub trait CombinatorError {
    /// Raised by [`rep`] when `min` exceeds `max`.
    fn invalid_repetition(min: usize, max: usize) -> Self;
}

/// Tuple of alternatives for [`alt`]; tried in order, first match wins.
pub trait Alt<S: Stream, E> {
    /// The common output type of all alternatives.
    type Output;

    /// Try each alternative on `input` in order.
    fn choice(&self, input: S) -> ParseOutcome<S, Self::Output, E>;
}

/// Ordered choice: the first alternative that matches decides the result.
///
/// A hard error from any alternative aborts the whole choice; a non-match
/// moves on to the next alternative with the input untouched.
pub fn alt<S, E, A>(alternatives: A) -> impl Parser<S, E, Output = A::Output>
where
    S: Stream,
    A: Alt<S, E>,
{
    move |input: S| alternatives.choice(input)
}

macro_rules! impl_alt {
    ($($parser:ident . $idx:tt),+) => {
        impl<S, E, Out, $($parser),+> Alt<S, E> for ($($parser,)+)
        where
            S: Stream,
            $($parser: Parser<S, E, Output = Out>,)+
        {
            type Output = Out;

            fn choice(&self, input: S) -> ParseOutcome<S, Out, E> {
                $(
                    if let Some(found) = self.$idx.parse(input.clone())? {
                        return Ok(Some(found));
                    }
                )+
                Ok(None)
            }
        }
    };
}

impl_alt!(A.0, B.1);
impl_alt!(A.0, B.1, C.2);
impl_alt!(A.0, B.1, C.2, D.3);
impl_alt!(A.0, B.1, C.2, D.3, F.4);
impl_alt!(A.0, B.1, C.2, D.3, F.4, G.5);
impl_alt!(A.0, B.1, C.2, D.3, F.4, G.5, H.6);
impl_alt!(A.0, B.1, C.2, D.3, F.4, G.5, H.6, I.7);

/// Tuple of parsers for [`cat`]; applied left to right on one stream.
pub trait Seq<S: Stream, E> {
    /// The tuple of all member outputs.
    type Output;

    /// Run every member in order, threading the stream through.
    fn sequence(&self, input: S) -> ParseOutcome<S, Self::Output, E>;
}

/// Concatenation: every member must match, in order, each continuing where
/// the previous one stopped. Any member's non-match fails the whole sequence
/// without consuming input.
pub fn cat<S, E, Q>(parsers: Q) -> impl Parser<S, E, Output = Q::Output>
where
    S: Stream,
    Q: Seq<S, E>,
{
    move |input: S| parsers.sequence(input)
}

macro_rules! impl_seq {
    ($($parser:ident . $idx:tt -> $value:ident),+) => {
        impl<S, E, $($parser),+> Seq<S, E> for ($($parser,)+)
        where
            S: Stream,
            $($parser: Parser<S, E>,)+
        {
            type Output = ($($parser::Output,)+);

            fn sequence(&self, input: S) -> ParseOutcome<S, Self::Output, E> {
                let rest = input;
                $(
                    let Some((rest, $value)) = self.$idx.parse(rest)? else {
                        return Ok(None);
                    };
                )+
                Ok(Some((rest, ($($value,)+))))
            }
        }
    };
}

impl_seq!(A.0 -> a, B.1 -> b);
impl_seq!(A.0 -> a, B.1 -> b, C.2 -> c);
impl_seq!(A.0 -> a, B.1 -> b, C.2 -> c, D.3 -> d);
impl_seq!(A.0 -> a, B.1 -> b, C.2 -> c, D.3 -> d, F.4 -> f);

/// Repetition with inclusive bounds: at least `min` matches, at most `max`
/// (`None` for unbounded).
///
/// Stops at the first non-match or when the stream runs dry; fewer than `min`
/// matches is a non-match of the whole repetition. `min > max` is a caller
/// bug and raises a hard error rather than silently matching nothing.
pub fn rep<S, E, P>(parser: P, min: usize, max: Option<usize>) -> impl Parser<S, E, Output = Vec<P::Output>>
where
    S: Stream,
    E: CombinatorError,
    P: Parser<S, E>,
{
    move |input: S| {
        if let Some(max) = max {
            if min > max {
                return Err(E::invalid_repetition(min, max));
            }
        }
        let mut items = Vec::new();
        let mut rest = input;
        while max.map_or(true, |m| items.len() < m) && !rest.is_empty() {
            match parser.parse(rest.clone())? {
                Some((next, value)) => {
                    rest = next;
                    items.push(value);
                }
                None => break,
            }
        }
        if items.len() < min {
            return Ok(None);
        }
        Ok(Some((rest, items)))
    }
}

/// Optional match: always succeeds, with `None` when the inner parser does
/// not match.
pub fn opt<S, E, P>(parser: P) -> impl Parser<S, E, Output = Option<P::Output>>
where
    S: Stream,
    P: Parser<S, E>,
{
    move |input: S| match parser.parse(input.clone())? {
        Some((rest, value)) => Ok(Some((rest, Some(value)))),
        None => Ok(Some((input, None))),
    }
}

/// Like [`opt`], but substitutes `default` for a non-match.
pub fn or_default<S, E, P>(parser: P, default: P::Output) -> impl Parser<S, E, Output = P::Output>
where
    S: Stream,
    P: Parser<S, E>,
    P::Output: Clone,
{
    move |input: S| match parser.parse(input.clone())? {
        Some(found) => Ok(Some(found)),
        None => Ok(Some((input, default.clone()))),
    }
}

/// Zero-width negative lookahead: matches (consuming nothing) exactly when
/// the inner parser does not match.
pub fn not<S, E, P>(parser: P) -> impl Parser<S, E, Output = ()>
where
    S: Stream,
    P: Parser<S, E>,
{
    move |input: S| match parser.parse(input.clone())? {
        Some(_) => Ok(None),
        None => Ok(Some((input, ()))),
    }
}

/// Matches `parser` only where `reject` does not match first.
pub fn diff<S, E, P, R>(parser: P, reject: R) -> impl Parser<S, E, Output = P::Output>
where
    S: Stream,
    P: Parser<S, E>,
    R: Parser<S, E>,
{
    move |input: S| {
        if reject.parse(input.clone())?.is_some() {
            return Ok(None);
        }
        parser.parse(input)
    }
}

/// One or more `element`s separated by `delimiter`.
///
/// A trailing delimiter is never consumed: the repetition stops before a
/// delimiter that is not followed by another element.
pub fn list<S, E, P, D>(element: P, delimiter: D) -> impl Parser<S, E, Output = Vec<P::Output>>
where
    S: Stream,
    P: Parser<S, E>,
    D: Parser<S, E>,
{
    move |input: S| {
        let Some((mut rest, first)) = element.parse(input)? else {
            return Ok(None);
        };
        let mut items = vec![first];
        loop {
            let Some((after_delimiter, _)) = delimiter.parse(rest.clone())? else {
                break;
            };
            let Some((next, item)) = element.parse(after_delimiter)? else {
                break;
            };
            rest = next;
            items.push(item);
        }
        Ok(Some((rest, items)))
    }
}

/// Transform the output of a successful match.
pub fn map<S, E, P, F, U>(parser: P, transform: F) -> impl Parser<S, E, Output = U>
where
    S: Stream,
    P: Parser<S, E>,
    F: Fn(P::Output) -> U,
{
    move |input: S| match parser.parse(input)? {
        Some((rest, value)) => Ok(Some((rest, transform(value)))),
        None => Ok(None),
    }
}

/// After `pre` matches, offer `continuation` the remaining stream and the
/// value so far. A non-match from the continuation falls back to `pre`'s own
/// result; a hard error still aborts.
///
/// This is how left-recursive suffixes (operator chains, call and index
/// postfixes) are folded without left recursion in the grammar itself.
pub fn may_continue<S, E, P, F>(pre: P, continuation: F) -> impl Parser<S, E, Output = P::Output>
where
    S: Stream,
    P: Parser<S, E>,
    P::Output: Clone,
    F: Fn(S, P::Output) -> ParseOutcome<S, P::Output, E>,
{
    move |input: S| {
        let Some((rest, value)) = pre.parse(input)? else {
            return Ok(None);
        };
        match continuation(rest.clone(), value.clone())? {
            Some(extended) => Ok(Some(extended)),
            None => Ok(Some((rest, value))),
        }
    }
}
