// Prompt templates for the three workflow steps
//
// Pure text assembly, no logic. The review template instructs the model to
// answer with the exact approval phrase routing looks for (see routing.rs).

/// Fixed user turn sent with the research prompt.
pub const RESEARCH_USER_MESSAGE: &str = "Generate search queries.";

/// Fixed user turn sent with the generation prompt.
pub const GENERATE_USER_MESSAGE: &str = "Generate the Terraform configuration.";

/// Fixed user turn sent with the review prompt.
pub const REVIEW_USER_MESSAGE: &str = "Review the Terraform code.";

/// System prompt asking for exactly three search queries for the task.
pub fn research_prompt(task: &str) -> String {
    format!(
        "You are an AWS Terraform research expert.\n\
         Given a user's request, follow these steps:\n\n\
         1. Parse the request and identify every AWS service or resource it \
         mentions (e.g. VPC, EC2, IAM, S3, RDS).\n\
         2. For each service, decide what documentation would help most: \
         official Terraform provider docs, official AWS docs, or community \
         guides and samples.\n\
         3. Craft exactly three concise search queries, each including \
         \"Terraform\" plus one or more of the identified services. Prefer \
         queries likely to return high-quality, up-to-date Terraform guides.\n\n\
         ---\n\n\
         User's request:\n{task}\n\n\
         Output only three search queries, one per line."
    )
}

/// System prompt for generating (or revising) the configuration.
///
/// When `critique` is non-empty this is a revision pass: the previous
/// review verdict is quoted verbatim with an instruction to address it.
pub fn generate_prompt(task: &str, content: &str, critique: &str) -> String {
    let mut prompt = format!(
        "You are an AWS Terraform expert.\n\
         Given a user's request and any supporting research, follow these steps:\n\n\
         1. Parse the request: list the required AWS resources and note any \
         special requirements (public vs. private, CIDR ranges, ports, key \
         names, tags).\n\
         2. Define variables: parameterize values such as region, CIDR \
         blocks, instance_type and key_name, with types, descriptions and \
         sensible defaults.\n\
         3. Select data sources for AWS-provided values such as the latest AMIs.\n\
         4. Compose resource blocks in dependency order with clear names, \
         tags and explicit dependencies.\n\
         5. Define outputs exposing useful values (public IP, instance id, \
         VPC id).\n\
         6. Produce a single main.tf that includes the provider, variables, \
         data sources, all resource blocks and outputs, following best \
         practices.\n\n\
         ---\n\n\
         User request:\n{task}\n\n\
         Research content:\n{content}\n\n\
         Output only the Terraform code inside one HCL code fence:\n\n\
         ```hcl\n\
         # your generated Terraform configuration here\n\
         ```"
    );

    if !critique.is_empty() {
        prompt.push_str(&format!(
            "\n\nPrevious critique: {critique}\nPlease address the issues mentioned."
        ));
    }

    prompt
}

/// System prompt for reviewing a generated configuration against the task.
pub fn review_prompt(task: &str, code: &str) -> String {
    format!(
        "You are an AWS Terraform review expert.\n\
         Given a user's request and a generated Terraform configuration, \
         follow these steps:\n\n\
         1. Parse the request: list the required AWS resources and constraints.\n\
         2. Analyze the code: identify the resources, data sources, variables \
         and outputs present, and match them against the requirements.\n\
         3. Validate correctness: every required resource is implemented, and \
         dependencies, attribute values and providers align with best practices.\n\
         4. Assess best practices: data sources for AMIs, parameterization via \
         variables, clear naming, tagging, complete networking, security group \
         egress rules and least privilege.\n\
         5. Produce the review. If everything is correct, respond:\n\
         \"The code is valid.\"\n\
         Otherwise, list specific issues and recommended fixes.\n\n\
         ---\n\n\
         User's request:\n{task}\n\n\
         Terraform code:\n{code}\n\n\
         Output only your review."
    )
}
