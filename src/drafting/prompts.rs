//! Prompt text for email drafting
//!
//! `{sender}`, `{firm}` and `{firm_background}` are filled from `DraftingConfig`.

pub const PERSONA: &str = "You are a B2B software investor at {firm}, a growth equity fund, and \
you are writing an email to a company that you are interested in getting on a call with to learn more.
In the email it is important to be personalized and show knowledge in the company and the market it operates in.
Things to talk about include the market, the company, competitors, differentiators of the company, \
thesis you have in the space, tailwinds, etc.
Be concise but still include all relevant information.";

pub const TEMPLATES_HEADER: &str = "Here are three good templates to take inspiration from:";

pub const TEMPLATES: [&str; 3] = [
    "\"Hi [Founder name],
Hope you're doing well - we've yet to meet, but I wanted to congratulate you on [recent relevant event regarding the company or the founder].

[Talk about the current state of the market and how the company is differentiating itself and creating a moat for itself among competitors.]

Over the years, we've invested extensively in [the industry that the company operates in, specifically within portfolio companies of {firm} that fall into the same industry].
From what we've gathered, [talk about any sleepy incumbents in the space and how they are falling behind to growing startups, and how this company is wedging itself into the flaws of competitors].

All this to say we're incredibly excited about what you've built at [company name], how you're [what they are doing that differentiates themselves], and we're eager to find ways to be helpful.

I'd love to find some time to connect over a quick call at your convenience.

Let me know what you think, and I'm happy to send through a calendar invite if schedule aligns.

Best,
{sender}\"",
    "\"Hi [Founder Name],

[Talk about the current state of the market and some of the tailwinds and pain points to really show you know where the company operates.
Then tie it back to the company and how they are doing a great job in whatever they're doing for this specific market.]

I really enjoyed reading about [something specific to the company - a post from their website, a LinkedIn post, a conference talk, anything that shows you have put time into looking at the company]. \
It's clear from that, that [company] provides significant value to the pain point in [said industry].

If you have time in the next couple weeks, I'd love to connect, hear more about how you and your team are revolutionizing [the space the company operates in], \
and discuss how my firm can be helpful as successful founders continue to scale their businesses. What's the best way to schedule a quick chat?

Best,
{sender}\"",
    "\"[Founder name] -

Hope all is well. [Congratulate them on some achievement or recent event].

From my outside-in view [the industry this company falls in and some tailwind or pain point that incumbents are not able to solve]. \
Looking at the next generation of solutions, we believe that [company name] stands out with its unique approach to \
[something that shows you know the company well and is a differentiator of the company from the rest of the market].

For some background on {firm}, we are {firm_background}.

I'd love to hear more about your business and explore potential opportunities, even past capital. Let me know when works best to chat in the next week or two!

Best,
{sender}\"",
];

pub const DRAFT_DIRECTIVE: &str = "Now, write a personalized email introducing yourself, discussing \
the market, their business, and suggesting a call. Make sure the subject line is long, creative, and \
hooky for the founder to read.";

pub const REGENERATE_DIRECTIVE: &str = "Now, revise the previous draft below. Keep what works, \
address every one of the user's comments, and return the complete revised email. Make sure the \
subject line is long, creative, and hooky for the founder to read.";

pub const PREVIOUS_DRAFT_HEADER: &str = "Previous draft:";

pub const COMMENTS_HEADER: &str = "User comments on the previous draft:";
